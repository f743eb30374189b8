use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use assistant_core::settings::{normalize_backend_url, AssistantSettings};
use shared::domain::ExecutionMode;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "assistant.toml";

/// Defaults, then `path` (if it exists), then environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<AssistantSettings> {
    let mut settings = AssistantSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            apply_file_overrides(&mut settings, &raw)
                .with_context(|| format!("failed to parse '{}'", path.display()))?;
            debug!(path = %path.display(), "loaded assistant config file");
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings.backend_url = normalize_backend_url(&settings.backend_url)?;
    Ok(settings)
}

pub fn apply_file_overrides(settings: &mut AssistantSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: HashMap<String, toml::Value> = toml::from_str(raw)?;
    let file_cfg: HashMap<String, String> = file_cfg
        .into_iter()
        .map(|(key, value)| match value {
            toml::Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect();

    apply_overrides(settings, |key| file_cfg.get(key).cloned());
    Ok(())
}

/// Both `ASSISTANT_<KEY>` and `APP__<KEY>` are accepted; the latter wins.
pub fn apply_env_overrides<F>(settings: &mut AssistantSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    apply_overrides(settings, |key| {
        let upper = key.to_ascii_uppercase();
        lookup(&format!("APP__{upper}")).or_else(|| lookup(&format!("ASSISTANT_{upper}")))
    });
}

fn apply_overrides<F>(settings: &mut AssistantSettings, get: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = get("backend_url") {
        settings.backend_url = v;
    }
    if let Some(v) = get("execution_mode") {
        settings.execution_mode = ExecutionMode::new(v);
    }
    if let Some(v) = get("auth_token") {
        settings.auth_token = Some(v).filter(|token| !token.trim().is_empty());
    }
    if let Some(ms) = get("demo_reply_delay_ms").and_then(|v| parse_u64("demo_reply_delay_ms", &v)) {
        settings.demo_reply_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = get("autoplay_interval_ms").and_then(|v| parse_u64("autoplay_interval_ms", &v)) {
        settings.autoplay_interval = Duration::from_millis(ms.max(1));
    }
    if let Some(ms) = get("scroll_debounce_ms").and_then(|v| parse_u64("scroll_debounce_ms", &v)) {
        settings.scroll_debounce = Duration::from_millis(ms);
    }
    if let Some(secs) =
        get("request_timeout_secs").and_then(|v| parse_u64("request_timeout_secs", &v))
    {
        settings.request_timeout = Duration::from_secs(secs);
    }
}

fn parse_u64(key: &str, raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value = raw, "ignoring non-numeric setting");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
