//! Canned scripts for demo playback and guided conversation.

use std::{collections::HashMap, sync::Arc};

use crate::context::PageKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoScenario {
    pub user_input: String,
    pub response: String,
}

impl DemoScenario {
    pub fn new(user_input: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            response: response.into(),
        }
    }
}

/// One exchange of the guided conversation: a user line and the assistant's
/// answer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStep {
    pub user: String,
    pub kognii: String,
}

impl ConversationStep {
    pub fn new(user: impl Into<String>, kognii: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            kognii: kognii.into(),
        }
    }
}

/// Immutable script set. Cheap to clone; scripts are shared.
#[derive(Debug, Clone)]
pub struct ScriptLibrary {
    demos: HashMap<PageKind, Arc<[DemoScenario]>>,
    fallback_demo: Arc<[DemoScenario]>,
    conversation: Arc<[ConversationStep]>,
}

impl ScriptLibrary {
    pub fn new(
        demos: HashMap<PageKind, Vec<DemoScenario>>,
        fallback_demo: Vec<DemoScenario>,
        conversation: Vec<ConversationStep>,
    ) -> Self {
        Self {
            demos: demos
                .into_iter()
                .map(|(page, scenarios)| (page, Arc::from(scenarios)))
                .collect(),
            fallback_demo: Arc::from(fallback_demo),
            conversation: Arc::from(conversation),
        }
    }

    /// Demo script for `page`, or the general one when the page has none.
    pub fn demo_for(&self, page: PageKind) -> Arc<[DemoScenario]> {
        self.demos
            .get(&page)
            .cloned()
            .unwrap_or_else(|| self.fallback_demo.clone())
    }

    pub fn conversation(&self) -> Arc<[ConversationStep]> {
        self.conversation.clone()
    }

    pub fn builtin() -> Self {
        let mut demos = HashMap::new();
        demos.insert(
            PageKind::Strategy,
            vec![
                DemoScenario::new(
                    "What should our strategic focus be next quarter?",
                    "Based on your current objectives, three themes stand out: expanding into the mid-market segment, improving onboarding retention, and reducing delivery cycle time. Onboarding retention has the strongest link to revenue, so I'd make it the primary focus.",
                ),
                DemoScenario::new(
                    "How do we measure progress on onboarding retention?",
                    "Track 30-day activation rate as the lead indicator and 90-day retention as the lag indicator. A reasonable quarterly target is moving activation from 42% to 55%, reviewed every two weeks.",
                ),
                DemoScenario::new(
                    "Who should own this objective?",
                    "Your product lead has the most context on onboarding and currently the lightest workload. I'd pair them with someone from customer success so feedback loops stay short.",
                ),
            ],
        );
        demos.insert(
            PageKind::Team,
            vec![
                DemoScenario::new(
                    "Is anyone on the team overloaded?",
                    "Two engineers are above 120% of planned capacity for the next sprint, mostly from carry-over work. Moving the reporting migration to next sprint would bring both back under 100%.",
                ),
                DemoScenario::new(
                    "Which skills are we missing?",
                    "Data engineering is the clearest gap: three upcoming initiatives depend on it and only one person has shipped pipeline work this year.",
                ),
                DemoScenario::new(
                    "What would you suggest?",
                    "Start with a short pairing rotation on the pipeline work and consider a contractor for the migration while the team ramps up.",
                ),
            ],
        );

        let fallback = vec![
            DemoScenario::new(
                "How is my team doing this week?",
                "Overall health is good: 8 of 10 objectives are on track, sentiment is steady, and delivery velocity is up 12% on last week. Two objectives need attention because of blocked dependencies.",
            ),
            DemoScenario::new(
                "Which objectives are blocked?",
                "The analytics dashboard rollout is waiting on data access approval, and the partner integration is waiting on an external API key. Both have been blocked for more than five days.",
            ),
            DemoScenario::new(
                "What should I do first?",
                "Escalate the data access approval today; it unblocks two downstream tasks. I can draft the escalation message if you like.",
            ),
        ];

        let conversation = vec![
            ConversationStep::new(
                "I want to set better goals for my team this quarter.",
                "Great place to start. What is the single outcome that would make this quarter a success?",
            ),
            ConversationStep::new(
                "Shipping the new onboarding flow and improving retention.",
                "Let's turn that into an objective: 'Deliver an onboarding experience that keeps new customers engaged.' Key results could be activation rate, time to first value, and 90-day retention.",
            ),
            ConversationStep::new(
                "How do I know who should work on it?",
                "Looking at current workload and past projects, your product lead and two frontend engineers have the right mix of context and capacity.",
            ),
            ConversationStep::new(
                "What risks should I watch for?",
                "The main risks are scope creep in the design phase and the dependency on the analytics team for activation tracking. A weekly check-in on both keeps them visible.",
            ),
            ConversationStep::new(
                "Thanks, that's a solid plan.",
                "You're welcome! I've summarized the objective and key results so you can add them to your strategy page whenever you're ready.",
            ),
        ];

        Self::new(demos, fallback, conversation)
    }
}

impl Default for ScriptLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}
