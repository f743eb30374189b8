//! Ordered message history for the visible conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::domain::{MessageId, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_suggestion: Option<Value>,
}

/// A message before the store has assigned it an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub role: Role,
    pub content: String,
    pub suggestions: Vec<String>,
    pub team_suggestion: Option<Value>,
}

impl MessageDraft {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            suggestions: Vec::new(),
            team_suggestion: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_team_suggestion(mut self, payload: Value) -> Self {
        self.team_suggestion = Some(payload);
        self
    }
}

/// Append-only except for [`Transcript::replace_all`]. Ids come from a
/// counter that survives resets, so they are strictly increasing for the
/// lifetime of the store.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, draft: MessageDraft) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.messages.push(Message {
            id,
            role: draft.role,
            content: draft.content,
            timestamp: Utc::now(),
            suggestions: draft.suggestions,
            team_suggestion: draft.team_suggestion,
        });
        id
    }

    pub fn replace_all<I>(&mut self, drafts: I)
    where
        I: IntoIterator<Item = MessageDraft>,
    {
        self.messages.clear();
        for draft in drafts {
            self.append(draft);
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Suggestions are only actionable on the most recent message.
    pub fn actionable_suggestions(&self) -> &[String] {
        self.latest()
            .map(|message| message.suggestions.as_slice())
            .unwrap_or_default()
    }

    pub fn is_latest(&self, id: MessageId) -> bool {
        self.latest().is_some_and(|message| message.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase_across_appends_and_resets() {
        let mut transcript = Transcript::new();
        let mut seen = Vec::new();
        for i in 0..5 {
            seen.push(transcript.append(MessageDraft::user(format!("q{i}"))));
        }
        transcript.replace_all([MessageDraft::assistant("welcome")]);
        seen.extend(transcript.messages().iter().map(|m| m.id));
        seen.push(transcript.append(MessageDraft::user("after reset")));

        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]), "{seen:?}");
    }

    #[test]
    fn render_order_matches_append_order() {
        let mut transcript = Transcript::new();
        for text in ["first", "second", "third"] {
            transcript.append(MessageDraft::user(text));
        }
        let contents: Vec<_> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn replace_all_drops_previous_messages() {
        let mut transcript = Transcript::new();
        transcript.append(MessageDraft::user("old"));
        transcript.append(MessageDraft::assistant("old reply"));
        transcript.replace_all(Vec::new());
        assert!(transcript.is_empty());
    }

    #[test]
    fn only_latest_message_suggestions_are_actionable() {
        let mut transcript = Transcript::new();
        let first = transcript.append(MessageDraft::assistant("hi").with_suggestions(["stale"]));
        assert_eq!(transcript.actionable_suggestions(), ["stale".to_string()]);

        let second = transcript.append(MessageDraft::assistant("next").with_suggestions(["fresh"]));
        assert_eq!(transcript.actionable_suggestions(), ["fresh".to_string()]);
        assert!(!transcript.is_latest(first));
        assert!(transcript.is_latest(second));

        transcript.append(MessageDraft::user("no chips"));
        assert!(transcript.actionable_suggestions().is_empty());
    }
}
