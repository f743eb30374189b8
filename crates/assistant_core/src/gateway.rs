//! Session Gateway: the only code that talks to the chat backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use shared::{
    domain::{ExecutionMode, SessionId},
    error::ErrorDetail,
    protocol::{CreateSessionResponse, RunRequest, RunResponse},
};
use tracing::{debug, info, warn};

use crate::{
    error::{AssistantError, BackendError, EMPTY_REPLY_FALLBACK},
    settings::AssistantSettings,
};

/// A server-issued conversation handle held by one open panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub text: String,
    /// True when the backend answered without usable content and the fixed
    /// fallback text was used instead.
    pub substituted: bool,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn create_session(&self) -> Result<CreateSessionResponse, BackendError>;
    async fn run(&self, request: RunRequest) -> Result<RunResponse, BackendError>;
}

pub struct HttpChatBackend {
    http: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpChatBackend {
    pub fn new(settings: &AssistantSettings) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.backend_url.trim_end_matches('/').to_string(),
            auth_token: settings.auth_token.clone(),
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.post(format!("{}{path}", self.base_url));
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn create_session(&self) -> Result<CreateSessionResponse, BackendError> {
        let response = self
            .post("/chat/sessions")
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn run(&self, request: RunRequest) -> Result<RunResponse, BackendError> {
        let response = self.post("/chat/run").json(&request).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

/// Turns a non-success response into a [`BackendError::Status`], preferring
/// the server's `detail` over a status-derived message.
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorDetail>(&body)
        .ok()
        .and_then(|envelope| envelope.message());

    match detail {
        Some(message) => Err(BackendError::Status {
            status: status.as_u16(),
            message,
        }),
        None => Err(BackendError::from_status(status)),
    }
}

#[derive(Clone)]
pub struct SessionGateway {
    backend: Arc<dyn ChatBackend>,
}

impl SessionGateway {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub async fn open(&self) -> Result<Session, AssistantError> {
        let created = self
            .backend
            .create_session()
            .await
            .map_err(|err| AssistantError::SessionUnavailable(err.to_string()))?;

        let session = Session {
            id: created.id,
            created_at: created.created_at.unwrap_or_else(Utc::now),
        };
        info!(session_id = %session.id, "assistant session opened");
        Ok(session)
    }

    pub async fn send(
        &self,
        session: Option<&Session>,
        text: &str,
        mode: &ExecutionMode,
    ) -> Result<TurnReply, AssistantError> {
        let session = session.ok_or(AssistantError::NoActiveSession)?;
        debug!(session_id = %session.id, mode = %mode, "submitting assistant turn");

        let response = self
            .backend
            .run(RunRequest {
                session_id: session.id.clone(),
                user_query: text.to_string(),
                execution_mode: mode.clone(),
            })
            .await
            .map_err(|err| AssistantError::TurnFailed(err.to_string()))?;

        match reply_text(&response) {
            Ok(text) => Ok(TurnReply {
                text,
                substituted: false,
            }),
            Err(AssistantError::EmptyReply) => {
                warn!(session_id = %session.id, "backend reply had no usable content; using fallback");
                Ok(TurnReply {
                    text: EMPTY_REPLY_FALLBACK.to_string(),
                    substituted: true,
                })
            }
            Err(err) => Err(err),
        }
    }
}

fn reply_text(response: &RunResponse) -> Result<String, AssistantError> {
    response
        .usable_reply()
        .map(str::to_string)
        .ok_or(AssistantError::EmptyReply)
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
