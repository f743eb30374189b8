//! Page contexts the assistant can be opened from.

use std::{fmt, str::FromStr};

use thiserror::Error;
use tracing::debug;

use crate::{suggestion::ENTER_CONVERSATION_MODE, transcript::MessageDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Dashboard,
    Strategy,
    Objectives,
    Team,
    Insights,
    Notifications,
}

#[derive(Debug, Error)]
#[error("unknown page identifier '{0}'")]
pub struct UnknownPage(pub String);

impl PageKind {
    pub const ALL: [PageKind; 6] = [
        PageKind::Dashboard,
        PageKind::Strategy,
        PageKind::Objectives,
        PageKind::Team,
        PageKind::Insights,
        PageKind::Notifications,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PageKind::Dashboard => "dashboard",
            PageKind::Strategy => "strategy",
            PageKind::Objectives => "objectives",
            PageKind::Team => "team",
            PageKind::Insights => "insights",
            PageKind::Notifications => "notifications",
        }
    }

    /// Resolves the identifier handed over by the router. Unknown pages get
    /// the dashboard context.
    pub fn from_identifier(identifier: &str) -> Self {
        identifier.parse().unwrap_or_else(|err: UnknownPage| {
            debug!(error = %err, "falling back to dashboard context");
            PageKind::Dashboard
        })
    }

    pub fn context(self) -> PageContext {
        match self {
            PageKind::Dashboard => PageContext {
                name: "Dashboard",
                description: "an overview of team health, goals and recent activity",
                capabilities: &[
                    "Summarize key team metrics",
                    "Highlight risks that need attention",
                    "Suggest priorities for the week",
                ],
            },
            PageKind::Strategy => PageContext {
                name: "Strategy",
                description: "strategic planning and the objectives that support it",
                capabilities: &[
                    "Draft strategic objectives",
                    "Stress-test a strategy against market conditions",
                    "Align team initiatives with the strategy",
                ],
            },
            PageKind::Objectives => PageContext {
                name: "Objectives",
                description: "objectives, key results and their progress",
                capabilities: &[
                    "Write measurable key results",
                    "Spot objectives that are off track",
                    "Recommend owners for objectives",
                ],
            },
            PageKind::Team => PageContext {
                name: "Team",
                description: "team members, roles and workload",
                capabilities: &[
                    "Balance workload across the team",
                    "Identify skill gaps",
                    "Suggest team compositions for new work",
                ],
            },
            PageKind::Insights => PageContext {
                name: "Insights",
                description: "trends and insights derived from team data",
                capabilities: &[
                    "Explain trends in the data",
                    "Compare performance across periods",
                    "Turn insights into next steps",
                ],
            },
            PageKind::Notifications => PageContext {
                name: "Notifications",
                description: "alerts and updates that need a response",
                capabilities: &[
                    "Triage notifications by urgency",
                    "Draft responses to updates",
                    "Summarize what changed recently",
                ],
            },
        }
    }

    /// The page-flavored prompt offered as the first suggestion chip.
    pub fn starter_prompt(self) -> &'static str {
        match self {
            PageKind::Dashboard => "Give me a quick overview of how my team is doing",
            PageKind::Strategy => "Help me refine our strategy for next quarter",
            PageKind::Objectives => "Which objectives are at risk right now?",
            PageKind::Team => "How balanced is my team's workload?",
            PageKind::Insights => "What are the most important trends this month?",
            PageKind::Notifications => "Which notifications need my attention first?",
        }
    }
}

impl FromStr for PageKind {
    type Err = UnknownPage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().trim_matches('/').to_ascii_lowercase();
        let key = normalized.rsplit('/').next().unwrap_or_default();
        PageKind::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| UnknownPage(value.to_string()))
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
}

/// Seed message shown when a conversation (re)starts in live chat.
pub fn welcome_message(page: PageKind, objective_creation_active: bool) -> MessageDraft {
    let context = page.context();
    let mut content = format!(
        "Hi! I'm your team assistant. You're on the {} page, which covers {}. I can help you:",
        context.name, context.description
    );
    for capability in context.capabilities {
        content.push_str("\n- ");
        content.push_str(capability);
    }
    if objective_creation_active {
        content.push_str("\n\nYou're creating an objective right now; I can help draft it.");
    }

    let mut suggestions = vec![page.starter_prompt().to_string()];
    if objective_creation_active {
        suggestions.push("Draft this objective with me".to_string());
    }
    suggestions.push(ENTER_CONVERSATION_MODE.to_string());

    MessageDraft::assistant(content).with_suggestions(suggestions)
}
