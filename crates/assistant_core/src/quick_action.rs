//! Page-aware quick actions and the prompts they expand to.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::context::PageKind;

/// Icons a quick action can carry. Rendering goes through [`ActionIcon::glyph`]
/// so every icon has exactly one mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionIcon {
    Chart,
    Target,
    Users,
    Lightbulb,
    Calendar,
    Sparkles,
    FileText,
    TrendingUp,
    Alert,
}

#[derive(Debug, Error)]
#[error("unknown action icon '{0}'")]
pub struct UnknownIcon(pub String);

impl ActionIcon {
    const ALL: [ActionIcon; 9] = [
        ActionIcon::Chart,
        ActionIcon::Target,
        ActionIcon::Users,
        ActionIcon::Lightbulb,
        ActionIcon::Calendar,
        ActionIcon::Sparkles,
        ActionIcon::FileText,
        ActionIcon::TrendingUp,
        ActionIcon::Alert,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ActionIcon::Chart => "chart",
            ActionIcon::Target => "target",
            ActionIcon::Users => "users",
            ActionIcon::Lightbulb => "lightbulb",
            ActionIcon::Calendar => "calendar",
            ActionIcon::Sparkles => "sparkles",
            ActionIcon::FileText => "file-text",
            ActionIcon::TrendingUp => "trending-up",
            ActionIcon::Alert => "alert",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ActionIcon::Chart => "📊",
            ActionIcon::Target => "🎯",
            ActionIcon::Users => "👥",
            ActionIcon::Lightbulb => "💡",
            ActionIcon::Calendar => "📅",
            ActionIcon::Sparkles => "✨",
            ActionIcon::FileText => "📄",
            ActionIcon::TrendingUp => "📈",
            ActionIcon::Alert => "⚠️",
        }
    }
}

impl FromStr for ActionIcon {
    type Err = UnknownIcon;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ActionIcon::ALL
            .into_iter()
            .find(|icon| icon.key() == value)
            .ok_or_else(|| UnknownIcon(value.to_string()))
    }
}

impl fmt::Display for ActionIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub icon: ActionIcon,
    pub label: &'static str,
    pub action: &'static str,
}

const fn action(icon: ActionIcon, label: &'static str, action: &'static str) -> QuickAction {
    QuickAction {
        icon,
        label,
        action,
    }
}

const BASE_ACTIONS: &[QuickAction] = &[
    action(ActionIcon::Chart, "Team overview", "team_overview"),
    action(ActionIcon::Lightbulb, "Suggestions", "get_suggestions"),
    action(ActionIcon::Calendar, "Weekly summary", "weekly_summary"),
];

const OBJECTIVE_CREATION_ACTIONS: &[QuickAction] = &[
    action(ActionIcon::Sparkles, "Draft objective", "draft_objective"),
    action(ActionIcon::Target, "Suggest key results", "suggest_key_results"),
];

const DASHBOARD_ACTIONS: &[QuickAction] = &[action(ActionIcon::Alert, "Risks", "identify_risks")];

const STRATEGY_ACTIONS: &[QuickAction] = &[
    action(ActionIcon::Target, "Strategic goals", "strategic_goals"),
    action(ActionIcon::TrendingUp, "Market analysis", "market_analysis"),
];

const OBJECTIVES_ACTIONS: &[QuickAction] = &[
    action(ActionIcon::Target, "Objectives at risk", "objectives_at_risk"),
    action(ActionIcon::Sparkles, "Suggest key results", "suggest_key_results"),
];

const TEAM_ACTIONS: &[QuickAction] = &[
    action(ActionIcon::Users, "Workload balance", "workload_balance"),
    action(ActionIcon::Lightbulb, "Skill gaps", "skill_gaps"),
];

const INSIGHTS_ACTIONS: &[QuickAction] = &[
    action(ActionIcon::TrendingUp, "Key trends", "key_trends"),
    action(ActionIcon::FileText, "Insight report", "insight_report"),
];

const NOTIFICATIONS_ACTIONS: &[QuickAction] =
    &[action(ActionIcon::Alert, "Triage alerts", "triage_notifications")];

fn page_actions(page: PageKind) -> &'static [QuickAction] {
    match page {
        PageKind::Dashboard => DASHBOARD_ACTIONS,
        PageKind::Strategy => STRATEGY_ACTIONS,
        PageKind::Objectives => OBJECTIVES_ACTIONS,
        PageKind::Team => TEAM_ACTIONS,
        PageKind::Insights => INSIGHTS_ACTIONS,
        PageKind::Notifications => NOTIFICATIONS_ACTIONS,
    }
}

fn canned_prompt(token: &str) -> Option<&'static str> {
    let prompt = match token {
        "team_overview" => "Give me an overview of my team's current performance and health.",
        "get_suggestions" => "What should I focus on next to help my team succeed?",
        "weekly_summary" => "Summarize what happened with my team this week.",
        "identify_risks" => "What risks should I be aware of across my team's work right now?",
        "strategic_goals" => "Help me define strategic goals for the next quarter.",
        "market_analysis" => "Analyze the market conditions that affect our strategy.",
        "objectives_at_risk" => "Which objectives are off track, and why?",
        "suggest_key_results" => "Suggest measurable key results for this objective.",
        "draft_objective" => "Help me draft a clear, ambitious objective.",
        "workload_balance" => "How is work distributed across my team? Is anyone overloaded?",
        "skill_gaps" => "What skill gaps does my team have for our upcoming work?",
        "key_trends" => "What are the most important trends in my team's data?",
        "insight_report" => "Write a short report of the key insights from this period.",
        "triage_notifications" => "Help me prioritize my notifications by urgency.",
        _ => return None,
    };
    Some(prompt)
}

#[derive(Debug, Clone, Copy)]
pub struct QuickActionDispatcher {
    page: PageKind,
    objective_creation_active: bool,
}

impl QuickActionDispatcher {
    pub fn new(page: PageKind) -> Self {
        Self {
            page,
            objective_creation_active: false,
        }
    }

    pub fn set_objective_creation_active(&mut self, active: bool) {
        self.objective_creation_active = active;
    }

    /// Base actions followed by the page's extensions. Extensions never
    /// replace a base action; a token that appears twice keeps its first entry.
    pub fn actions(&self) -> Vec<QuickAction> {
        let extra: &[QuickAction] = if self.objective_creation_active {
            OBJECTIVE_CREATION_ACTIONS
        } else {
            &[]
        };

        let mut merged: Vec<QuickAction> = Vec::new();
        for candidate in BASE_ACTIONS
            .iter()
            .chain(page_actions(self.page))
            .chain(extra)
        {
            if !merged.iter().any(|existing| existing.action == candidate.action) {
                merged.push(*candidate);
            }
        }
        merged
    }

    /// Prompt text submitted on behalf of the user for `token`.
    pub fn dispatch(&self, token: &str) -> String {
        match canned_prompt(token) {
            Some(prompt) => prompt.to_string(),
            None => format!(
                "Help me with \"{}\" in the context of the {} page.",
                token.replace('_', " "),
                self.page.context().name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_extensions_are_added_to_base_set() {
        let dispatcher = QuickActionDispatcher::new(PageKind::Strategy);
        let tokens: Vec<_> = dispatcher.actions().iter().map(|a| a.action).collect();
        assert_eq!(
            tokens,
            [
                "team_overview",
                "get_suggestions",
                "weekly_summary",
                "strategic_goals",
                "market_analysis"
            ]
        );
    }

    #[test]
    fn objective_creation_extension_deduplicates_tokens() {
        let mut dispatcher = QuickActionDispatcher::new(PageKind::Objectives);
        dispatcher.set_objective_creation_active(true);
        let actions = dispatcher.actions();
        let key_results = actions
            .iter()
            .filter(|a| a.action == "suggest_key_results")
            .count();
        assert_eq!(key_results, 1);
        assert!(actions.iter().any(|a| a.action == "draft_objective"));
    }

    #[test]
    fn every_offered_action_has_a_canned_prompt() {
        for page in PageKind::ALL {
            let mut dispatcher = QuickActionDispatcher::new(page);
            dispatcher.set_objective_creation_active(true);
            for quick in dispatcher.actions() {
                assert!(canned_prompt(quick.action).is_some(), "{}", quick.action);
            }
        }
    }

    #[test]
    fn unknown_token_names_token_and_page() {
        let dispatcher = QuickActionDispatcher::new(PageKind::Team);
        let prompt = dispatcher.dispatch("hiring_plan");
        assert!(prompt.contains("hiring plan"), "{prompt}");
        assert!(prompt.contains("Team"), "{prompt}");
    }

    #[test]
    fn icons_parse_from_keys_and_reject_unknown() {
        assert_eq!("trending-up".parse::<ActionIcon>().ok(), Some(ActionIcon::TrendingUp));
        assert!("rocket".parse::<ActionIcon>().is_err());
        for icon in ActionIcon::ALL {
            assert_eq!(icon.key().parse::<ActionIcon>().ok(), Some(icon));
        }
    }
}
