//! The assistant panel: composition root of the conversation orchestrator.
//!
//! One `AssistantPanel` is owned by one view. All mutation goes through
//! `&mut self`, so at most one backend turn can be in flight. Timers and
//! bridge calls never touch state directly; they queue [`InboundEvent`]s that
//! the owner drains with [`AssistantPanel::next_inbound`] and applies with
//! [`AssistantPanel::handle_inbound`].

use std::sync::Arc;

use serde_json::Value;
use shared::domain::MessageId;
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver},
};
use tracing::{debug, info, warn};

use crate::{
    bridge::{team_suggestion_text, BridgeEvent, BridgeHandle},
    context::{welcome_message, PageContext, PageKind},
    error::AssistantError,
    events::{InboundEvent, PanelEvent},
    gateway::{ChatBackend, Session, SessionGateway},
    mode::{Mode, ModeController, ModeTimings},
    quick_action::{QuickAction, QuickActionDispatcher},
    script::ScriptLibrary,
    settings::AssistantSettings,
    suggestion::{self, SuggestionRoute},
    timer::{InboundSender, TimerSlot},
    transcript::{Message, MessageDraft, Transcript},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    mode: Mode,
    autoplay: bool,
    thinking: bool,
    transcript_len: usize,
    latest_id: Option<MessageId>,
}

pub struct AssistantPanel {
    gateway: SessionGateway,
    settings: AssistantSettings,
    scripts: ScriptLibrary,
    page: PageKind,
    session: Option<Session>,
    session_error: Option<String>,
    transcript: Transcript,
    modes: ModeController,
    quick_actions: QuickActionDispatcher,
    objective_creation_active: bool,
    turn_in_flight: bool,
    scroll: TimerSlot,
    inbound_tx: InboundSender,
    inbound_rx: UnboundedReceiver<InboundEvent>,
    events: broadcast::Sender<PanelEvent>,
}

impl AssistantPanel {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        settings: AssistantSettings,
        scripts: ScriptLibrary,
    ) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(256);
        let page = PageKind::Dashboard;
        let modes = ModeController::new(
            scripts.demo_for(page),
            scripts.conversation(),
            ModeTimings {
                demo_reply_delay: settings.demo_reply_delay,
                autoplay_interval: settings.autoplay_interval,
            },
            inbound_tx.clone(),
        );

        Self {
            gateway: SessionGateway::new(backend),
            settings,
            scripts,
            page,
            session: None,
            session_error: None,
            transcript: Transcript::new(),
            modes,
            quick_actions: QuickActionDispatcher::new(page),
            objective_creation_active: false,
            turn_in_flight: false,
            scroll: TimerSlot::new("scroll_debounce"),
            inbound_tx,
            inbound_rx,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }

    /// Handle for screens that need to talk back to the assistant.
    pub fn bridge(&self) -> BridgeHandle {
        BridgeHandle::new(self.inbound_tx.clone())
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn page(&self) -> PageKind {
        self.page
    }

    pub fn page_context(&self) -> PageContext {
        self.page.context()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Why the session could not be opened, while that failure persists.
    pub fn session_error(&self) -> Option<&str> {
        self.session_error.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn actionable_suggestions(&self) -> &[String] {
        self.transcript.actionable_suggestions()
    }

    pub fn quick_actions(&self) -> Vec<QuickAction> {
        self.quick_actions.actions()
    }

    pub fn demo_cursor(&self) -> usize {
        self.modes.demo_cursor()
    }

    pub fn guided_cursor(&self) -> usize {
        self.modes.guided_cursor()
    }

    pub fn autoplay_active(&self) -> bool {
        self.modes.autoplay_active()
    }

    pub fn objective_creation_active(&self) -> bool {
        self.objective_creation_active
    }

    /// Typing indicator: a backend turn or a scripted demo reply is pending.
    pub fn is_thinking(&self) -> bool {
        self.turn_in_flight || self.modes.demo_reply_pending()
    }

    pub fn can_send(&self) -> bool {
        self.session.is_some() && !self.is_thinking()
    }

    /// Opens the panel on `page_identifier`: Idle -> LiveChat, one session per
    /// open. A failed session open leaves the panel in live chat without a
    /// session and a persistent error message.
    pub async fn open(&mut self, page_identifier: &str) {
        if self.modes.mode() != Mode::Idle {
            warn!(page = %self.page, "assistant panel is already open");
            return;
        }

        let page = PageKind::from_identifier(page_identifier);
        self.page = page;
        self.quick_actions = QuickActionDispatcher::new(page);
        self.quick_actions
            .set_objective_creation_active(self.objective_creation_active);
        self.modes.set_demo_script(self.scripts.demo_for(page));

        let before = self.snapshot();
        let seed = match self.gateway.open().await {
            Ok(session) => {
                let _ = self.events.send(PanelEvent::SessionOpened(session.id.clone()));
                self.session = Some(session);
                self.session_error = None;
                vec![self.welcome()]
            }
            Err(err) => {
                warn!(error = %err, page = %page, "failed to open assistant session");
                let draft = MessageDraft::assistant(err.transcript_text());
                if let AssistantError::SessionUnavailable(reason) = err {
                    self.session_error = Some(reason);
                }
                vec![draft]
            }
        };
        self.modes.activate(&mut self.transcript, seed);
        info!(page = %page, has_session = self.session.is_some(), "assistant panel opened");
        self.publish_changes(before);
    }

    /// Closes the panel: the session is discarded and every timer cancelled.
    pub fn close(&mut self) {
        if self.modes.mode() == Mode::Idle && self.session.is_none() {
            return;
        }
        let before = self.snapshot();
        self.modes.shutdown();
        self.turn_in_flight = false;
        self.transcript.replace_all(Vec::new());
        if let Some(session) = self.session.take() {
            info!(session_id = %session.id, "assistant session discarded");
        }
        self.session_error = None;
        self.publish_changes(before);
        // The view is going away; no scroll for the cleared transcript.
        self.scroll.cancel();
        let _ = self.events.send(PanelEvent::SessionClosed);
    }

    /// Text typed into the input box. In demo playback this plays the next
    /// scripted line instead of reaching the backend.
    pub async fn submit_input(&mut self, text: &str) {
        match self.modes.mode() {
            Mode::DemoPlayback => {
                self.demo_input();
            }
            _ => self.submit_turn(text).await,
        }
    }

    /// Expands a quick action into its prompt and submits it as a user turn.
    pub async fn quick_action(&mut self, token: &str) {
        let prompt = self.quick_actions.dispatch(token);
        debug!(token, "dispatching quick action");
        self.submit_turn(&prompt).await;
    }

    /// A chip click. Chips on anything but the most recent message are stale,
    /// and only text that message actually offered is accepted.
    pub async fn click_suggestion(&mut self, message_id: MessageId, text: &str) {
        if !self.transcript.is_latest(message_id) {
            debug!(%message_id, "ignoring suggestion on a stale message");
            return;
        }
        if !self
            .transcript
            .actionable_suggestions()
            .iter()
            .any(|offered| offered == text)
        {
            debug!(%message_id, text, "ignoring suggestion the message did not offer");
            return;
        }
        self.route_suggestion(text).await;
    }

    pub async fn route_suggestion(&mut self, text: &str) {
        match suggestion::route(text, self.modes.demo_has_remaining()) {
            SuggestionRoute::ContinueDemo => {
                self.demo_input();
            }
            SuggestionRoute::EnterGuided => {
                self.enter_guided();
            }
            SuggestionRoute::StartNewConversation => {
                self.start_new_conversation();
            }
            SuggestionRoute::Submit(content) => self.submit_turn(&content).await,
        }
    }

    /// Submits one live turn. Scripted modes are left first. All failures end
    /// up as a single assistant message.
    pub async fn submit_turn(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.turn_in_flight {
            // `&mut self` rules out a concurrent turn, so the flag can only be
            // left over from a turn whose future was dropped mid-request.
            warn!("previous assistant turn was abandoned before completing");
            self.turn_in_flight = false;
        }

        if self.modes.is_scripted() {
            let before = self.snapshot();
            let seed = vec![self.welcome()];
            self.modes.leave_scripted(&mut self.transcript, seed);
            self.publish_changes(before);
        }

        if self.session.is_none() {
            self.append_error(AssistantError::NoActiveSession);
            return;
        }

        let before = self.snapshot();
        self.transcript.append(MessageDraft::user(text));
        self.turn_in_flight = true;
        self.publish_changes(before);

        let result = self
            .gateway
            .send(self.session.as_ref(), text, &self.settings.execution_mode)
            .await;

        let before = self.snapshot();
        self.turn_in_flight = false;
        match result {
            Ok(reply) => {
                self.transcript.append(MessageDraft::assistant(reply.text));
            }
            Err(err) => {
                warn!(error = %err, "assistant turn failed");
                self.transcript
                    .append(MessageDraft::assistant(err.transcript_text()));
            }
        }
        self.publish_changes(before);
    }

    pub fn enter_demo(&mut self) -> bool {
        let before = self.snapshot();
        let changed = self.modes.enter_demo(&mut self.transcript);
        self.publish_changes(before);
        changed
    }

    pub fn demo_input(&mut self) -> bool {
        let before = self.snapshot();
        let changed = self.modes.demo_input(&mut self.transcript);
        self.publish_changes(before);
        changed
    }

    pub fn enter_guided(&mut self) -> bool {
        let before = self.snapshot();
        let changed = self.modes.enter_guided(&mut self.transcript);
        self.publish_changes(before);
        changed
    }

    pub fn start_autoplay(&mut self) -> bool {
        let before = self.snapshot();
        let changed = self.modes.start_autoplay();
        self.publish_changes(before);
        changed
    }

    pub fn stop_autoplay(&mut self) -> bool {
        let before = self.snapshot();
        let changed = self.modes.stop_autoplay();
        self.publish_changes(before);
        changed
    }

    pub fn guided_next(&mut self) -> bool {
        let before = self.snapshot();
        let seed = vec![self.welcome()];
        let changed = self.modes.guided_next(&mut self.transcript, seed);
        self.publish_changes(before);
        changed
    }

    pub fn guided_reset(&mut self) -> bool {
        let before = self.snapshot();
        let changed = self.modes.guided_reset(&mut self.transcript);
        self.publish_changes(before);
        changed
    }

    pub fn exit_guided(&mut self) -> bool {
        let before = self.snapshot();
        let seed = vec![self.welcome()];
        let changed = self.modes.exit_guided(&mut self.transcript, seed);
        self.publish_changes(before);
        changed
    }

    pub fn start_new_conversation(&mut self) -> bool {
        let before = self.snapshot();
        let seed = vec![self.welcome()];
        let changed = self.modes.start_new_conversation(&mut self.transcript, seed);
        self.publish_changes(before);
        changed
    }

    /// Next queued timer or bridge event.
    pub async fn next_inbound(&mut self) -> Option<InboundEvent> {
        self.inbound_rx.recv().await
    }

    /// Non-blocking variant for frame-driven views.
    pub fn try_next_inbound(&mut self) -> Option<InboundEvent> {
        self.inbound_rx.try_recv().ok()
    }

    pub fn handle_inbound(&mut self, event: InboundEvent) {
        let before = self.snapshot();
        match event {
            InboundEvent::DemoReplyDue { generation } => {
                self.modes.on_demo_reply_due(generation, &mut self.transcript);
            }
            InboundEvent::AutoplayTick { generation } => {
                self.modes.on_autoplay_tick(generation, &mut self.transcript);
            }
            InboundEvent::ScrollDue { generation } => {
                if self.scroll.complete(generation) {
                    let _ = self.events.send(PanelEvent::ScrollToLatest);
                }
            }
            InboundEvent::Bridge(event) => self.apply_bridge(event),
        }
        self.publish_changes(before);
    }

    fn apply_bridge(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::ObjectiveCreationActive(active) => {
                debug!(active, "objective creation state changed");
                self.objective_creation_active = active;
                self.quick_actions.set_objective_creation_active(active);
            }
            BridgeEvent::TeamSuggestion(payload) => self.append_team_suggestion(payload),
        }
    }

    fn append_team_suggestion(&mut self, payload: Value) {
        if self.modes.mode() != Mode::LiveChat {
            debug!(mode = %self.modes.mode(), "team suggestion ignored outside live chat");
            return;
        }
        let text = team_suggestion_text(&payload);
        self.transcript
            .append(MessageDraft::assistant(text).with_team_suggestion(payload));
    }

    fn append_error(&mut self, err: AssistantError) {
        warn!(error = %err, "assistant request rejected");
        let before = self.snapshot();
        self.transcript
            .append(MessageDraft::assistant(err.transcript_text()));
        self.publish_changes(before);
    }

    fn welcome(&self) -> MessageDraft {
        welcome_message(self.page, self.objective_creation_active)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.modes.mode(),
            autoplay: self.modes.autoplay_active(),
            thinking: self.is_thinking(),
            transcript_len: self.transcript.len(),
            latest_id: self.transcript.latest().map(|message| message.id),
        }
    }

    fn publish_changes(&mut self, before: Snapshot) {
        let after = self.snapshot();
        if after.mode != before.mode {
            let _ = self.events.send(PanelEvent::ModeChanged(after.mode));
        }
        if after.autoplay != before.autoplay {
            let _ = self.events.send(PanelEvent::AutoplayChanged(after.autoplay));
        }
        if after.thinking != before.thinking {
            let _ = self.events.send(PanelEvent::ThinkingChanged(after.thinking));
        }
        if after.transcript_len != before.transcript_len || after.latest_id != before.latest_id {
            let _ = self.events.send(PanelEvent::TranscriptChanged {
                len: after.transcript_len,
            });
            self.scroll.schedule_once(
                self.settings.scroll_debounce,
                self.inbound_tx.clone(),
                |generation| InboundEvent::ScrollDue { generation },
            );
        }
    }
}

#[cfg(test)]
#[path = "tests/panel_tests.rs"]
mod tests;
