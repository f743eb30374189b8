//! Disambiguates suggestion chips between mode controls and ordinary content.

use tracing::debug;

pub const CONTINUE_DEMO: &str = "Continue demo conversation";
pub const ENTER_CONVERSATION_MODE: &str = "Enter conversation mode";
pub const START_NEW_CONVERSATION: &str = "Start new conversation";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionRoute {
    ContinueDemo,
    EnterGuided,
    StartNewConversation,
    /// Forward as a user turn.
    Submit(String),
}

/// Classifies a clicked chip. "Continue demo conversation" is only a control
/// while demo playback has steps left; otherwise it is plain text like any
/// other chip.
pub fn route(text: &str, demo_has_remaining: bool) -> SuggestionRoute {
    let trimmed = text.trim();
    let route = if trimmed.eq_ignore_ascii_case(CONTINUE_DEMO) && demo_has_remaining {
        SuggestionRoute::ContinueDemo
    } else if trimmed.eq_ignore_ascii_case(ENTER_CONVERSATION_MODE) {
        SuggestionRoute::EnterGuided
    } else if trimmed.eq_ignore_ascii_case(START_NEW_CONVERSATION) {
        SuggestionRoute::StartNewConversation
    } else {
        SuggestionRoute::Submit(trimmed.to_string())
    };
    debug!(?route, "routed suggestion");
    route
}
