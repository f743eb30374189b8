use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{ExecutionMode, SessionId};

/// Response body of `POST /chat/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub id: SessionId,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body of `POST /chat/run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub session_id: SessionId,
    pub user_query: String,
    pub execution_mode: ExecutionMode,
}

/// Response body of `POST /chat/run`. Every field is optional on the wire;
/// a missing or blank `final_report` is treated as an empty reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub final_report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
}

impl RunResponse {
    /// The reply text if the backend produced one with visible content.
    pub fn usable_reply(&self) -> Option<&str> {
        self.final_report
            .as_deref()
            .filter(|report| !report.trim().is_empty())
    }
}

/// Accepts RFC 3339 timestamps as well as the zone-less ISO form some
/// backends emit (`2024-05-01T10:00:00.123456`), which is read as UTC.
fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_response_accepts_naive_timestamp() {
        let body = r#"{"id":"s-1","user_id":"u-1","title":"New chat","created_at":"2024-05-01T10:00:00.123456"}"#;
        let parsed: CreateSessionResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.id, SessionId("s-1".into()));
        assert!(parsed.created_at.is_some());
    }

    #[test]
    fn session_response_tolerates_missing_metadata() {
        let parsed: CreateSessionResponse = serde_json::from_str(r#"{"id":"s-2"}"#).expect("parse");
        assert!(parsed.created_at.is_none());
        assert!(parsed.title.is_none());
    }

    #[test]
    fn blank_final_report_is_not_usable() {
        let parsed: RunResponse =
            serde_json::from_str(r#"{"final_report":"   ","session_id":"s-1"}"#).expect("parse");
        assert!(parsed.usable_reply().is_none());

        let missing: RunResponse = serde_json::from_str(r#"{"session_id":"s-1"}"#).expect("parse");
        assert!(missing.usable_reply().is_none());
    }

    #[test]
    fn run_request_serializes_pass_through_mode() {
        let request = RunRequest {
            session_id: SessionId("s-9".into()),
            user_query: "hello".into(),
            execution_mode: ExecutionMode::default(),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["session_id"], "s-9");
        assert_eq!(value["execution_mode"], "auto");
    }
}
