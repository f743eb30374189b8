use assistant_core::{AssistantPanel, Message, Mode, PanelEvent, QuickAction};
use shared::domain::{MessageId, Role};

/// Prints transcript entries the terminal has not shown yet.
#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    last_printed: Option<MessageId>,
}

impl TranscriptPrinter {
    pub fn print_new(&mut self, panel: &AssistantPanel) {
        let messages = panel.messages();
        let latest = messages.last().map(|message| message.id);
        let last_printed = self.last_printed;
        for message in messages
            .iter()
            .filter(|message| last_printed.map_or(true, |seen| message.id > seen))
        {
            println!("{}", format_message(message));
            if Some(message.id) == latest && !message.suggestions.is_empty() {
                println!("{}", format_chips(&message.suggestions));
            }
            self.last_printed = Some(message.id);
        }
    }
}

pub fn format_message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "kognii",
        Role::System => "system",
    };
    let mut line = format!("[{}] {speaker}: {}", message.timestamp.format("%H:%M:%S"), message.content);
    if let Some(payload) = &message.team_suggestion {
        line.push_str(&format!("\n    team: {payload}"));
    }
    line
}

pub fn format_chips(suggestions: &[String]) -> String {
    suggestions
        .iter()
        .enumerate()
        .map(|(index, text)| format!("  ({}) {text}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_actions(actions: &[QuickAction]) -> String {
    actions
        .iter()
        .map(|action| format!("  {} {:<28} /action {}", action.icon.glyph(), action.label, action.action))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Status line for view events that are not already visible in the transcript.
pub fn describe_event(event: &PanelEvent) -> Option<String> {
    match event {
        PanelEvent::ThinkingChanged(true) => Some("kognii is thinking...".into()),
        PanelEvent::ModeChanged(Mode::Idle) => None,
        PanelEvent::ModeChanged(mode) => Some(format!("-- {mode} --")),
        PanelEvent::AutoplayChanged(true) => Some("autoplay on".into()),
        PanelEvent::AutoplayChanged(false) => Some("autoplay off".into()),
        PanelEvent::SessionOpened(id) => Some(format!("session {id} opened")),
        PanelEvent::SessionClosed => Some("session closed".into()),
        PanelEvent::ThinkingChanged(false)
        | PanelEvent::TranscriptChanged { .. }
        | PanelEvent::ScrollToLatest => None,
    }
}
