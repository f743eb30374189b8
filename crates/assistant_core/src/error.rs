//! Failure taxonomy for the assistant orchestrator.
//!
//! Nothing in here is fatal: every variant is recovered at the panel boundary
//! and turned into transcript content.

use thiserror::Error;

/// Text substituted when the backend answers without usable content.
pub const EMPTY_REPLY_FALLBACK: &str =
    "I couldn't put together an answer for that. Could you try rephrasing your question?";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("malformed backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Generic message for a non-success status without server detail.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            message: format!("request failed with status {status}"),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else if let Some(status) = value.status() {
            Self::from_status(status)
        } else {
            Self::Transport(value.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant session unavailable: {0}")]
    SessionUnavailable(String),
    #[error("no active assistant session")]
    NoActiveSession,
    #[error("assistant turn failed: {0}")]
    TurnFailed(String),
    #[error("assistant returned an empty reply")]
    EmptyReply,
}

impl AssistantError {
    /// Assistant-authored text rendered into the transcript for this failure.
    pub fn transcript_text(&self) -> String {
        match self {
            Self::SessionUnavailable(reason) => format!(
                "I couldn't start a conversation session ({reason}). Close and reopen the assistant to try again."
            ),
            Self::NoActiveSession => {
                "There is no active assistant session, so I can't send that yet. Reopen the assistant to start one."
                    .to_string()
            }
            Self::TurnFailed(reason) => {
                format!("Sorry, something went wrong while answering: {reason}")
            }
            Self::EmptyReply => EMPTY_REPLY_FALLBACK.to_string(),
        }
    }
}
