use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error envelope returned by the chat backend on non-success statuses.
/// `detail` is usually a string but validation failures carry a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorDetail {
    /// Human readable detail, if the server supplied a non-empty one.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let parsed: ErrorDetail =
            serde_json::from_str(r#"{"detail":"Session not found"}"#).expect("parse");
        assert_eq!(parsed.message().as_deref(), Some("Session not found"));
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let parsed: ErrorDetail =
            serde_json::from_str(r#"{"detail":[{"loc":["body","user_query"],"msg":"field required"}]}"#)
                .expect("parse");
        let message = parsed.message().expect("message");
        assert!(message.contains("field required"));
    }

    #[test]
    fn blank_or_missing_detail_is_none() {
        let blank: ErrorDetail = serde_json::from_str(r#"{"detail":""}"#).expect("parse");
        assert!(blank.message().is_none());
        let missing: ErrorDetail = serde_json::from_str("{}").expect("parse");
        assert!(missing.message().is_none());
    }
}
