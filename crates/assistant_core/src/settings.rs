use std::time::Duration;

use anyhow::{bail, Context};
use shared::domain::ExecutionMode;
use url::Url;

/// Runtime knobs for the orchestrator. The front end decides where they come
/// from; the library only consumes them.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub backend_url: String,
    pub execution_mode: ExecutionMode,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub demo_reply_delay: Duration,
    pub autoplay_interval: Duration,
    pub scroll_debounce: Duration,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".into(),
            execution_mode: ExecutionMode::default(),
            auth_token: None,
            request_timeout: Duration::from_secs(60),
            demo_reply_delay: Duration::from_millis(1500),
            autoplay_interval: Duration::from_millis(4000),
            scroll_debounce: Duration::from_millis(100),
        }
    }
}

/// Validates a backend base URL and strips trailing slashes so endpoint
/// paths can be appended directly.
pub fn normalize_backend_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(AssistantSettings::default().backend_url);
    }

    let parsed = Url::parse(raw).with_context(|| format!("invalid backend url '{raw}'"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => bail!("unsupported backend url scheme '{other}' in '{raw}'"),
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
