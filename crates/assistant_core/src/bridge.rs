//! Channel through which dashboard screens talk back to the assistant.
//!
//! Screens receive a [`BridgeHandle`] explicitly instead of reaching for
//! shared global state. Calls are queued and applied by the panel owner.

use serde_json::Value;

use crate::{events::InboundEvent, timer::InboundSender};

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    ObjectiveCreationActive(bool),
    TeamSuggestion(Value),
}

pub trait AssistantBridge: Send + Sync {
    fn set_objective_creation_active(&self, active: bool);
    fn set_team_suggestion(&self, payload: Value);
}

#[derive(Clone)]
pub struct BridgeHandle {
    tx: InboundSender,
}

impl BridgeHandle {
    pub(crate) fn new(tx: InboundSender) -> Self {
        Self { tx }
    }

    fn post(&self, event: BridgeEvent) {
        if self.tx.send(InboundEvent::Bridge(event)).is_err() {
            tracing::debug!("assistant panel dropped; bridge call ignored");
        }
    }
}

impl AssistantBridge for BridgeHandle {
    fn set_objective_creation_active(&self, active: bool) {
        self.post(BridgeEvent::ObjectiveCreationActive(active));
    }

    fn set_team_suggestion(&self, payload: Value) {
        self.post(BridgeEvent::TeamSuggestion(payload));
    }
}

/// Text shown above a team suggestion. Uses the payload's `summary` when the
/// screen provided one.
pub fn team_suggestion_text(payload: &Value) -> String {
    payload
        .get("summary")
        .and_then(Value::as_str)
        .filter(|summary| !summary.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "Here's a team I'd suggest for this objective.".to_string())
}
