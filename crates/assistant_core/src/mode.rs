//! Mode Controller: live chat, demo playback and guided conversation.
//!
//! The controller owns both script cursors and the two timers that drive
//! scripted content (the delayed demo reply and the guided autoplay ticker).
//! Every transition that leaves a mode cancels that mode's timers.

use std::{fmt, sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    events::InboundEvent,
    script::{ConversationStep, DemoScenario},
    suggestion::{CONTINUE_DEMO, ENTER_CONVERSATION_MODE, START_NEW_CONVERSATION},
    timer::{InboundSender, TimerSlot},
    transcript::{MessageDraft, Transcript},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    LiveChat,
    DemoPlayback,
    GuidedConversation,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Idle => "idle",
            Mode::LiveChat => "live_chat",
            Mode::DemoPlayback => "demo_playback",
            Mode::GuidedConversation => "guided_conversation",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModeTimings {
    pub demo_reply_delay: Duration,
    pub autoplay_interval: Duration,
}

pub struct ModeController {
    mode: Mode,
    timings: ModeTimings,
    inbound: InboundSender,

    demo: Arc<[DemoScenario]>,
    demo_cursor: usize,
    pending_demo_step: Option<usize>,
    demo_reply: TimerSlot,

    conversation: Arc<[ConversationStep]>,
    guided_cursor: usize,
    autoplay: TimerSlot,
}

impl ModeController {
    pub fn new(
        demo: Arc<[DemoScenario]>,
        conversation: Arc<[ConversationStep]>,
        timings: ModeTimings,
        inbound: InboundSender,
    ) -> Self {
        Self {
            mode: Mode::Idle,
            timings,
            inbound,
            demo,
            demo_cursor: 0,
            pending_demo_step: None,
            demo_reply: TimerSlot::new("demo_reply"),
            conversation,
            guided_cursor: 0,
            autoplay: TimerSlot::new("guided_autoplay"),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn demo_cursor(&self) -> usize {
        self.demo_cursor
    }

    pub fn guided_cursor(&self) -> usize {
        self.guided_cursor
    }

    pub fn autoplay_active(&self) -> bool {
        self.autoplay.is_active()
    }

    pub fn demo_reply_pending(&self) -> bool {
        self.pending_demo_step.is_some()
    }

    /// Whether demo playback still has scripted steps ahead. A pending reply
    /// does not count as the end of the script.
    pub fn demo_has_remaining(&self) -> bool {
        self.mode == Mode::DemoPlayback && self.demo_cursor < self.demo.len()
    }

    pub fn is_scripted(&self) -> bool {
        matches!(self.mode, Mode::DemoPlayback | Mode::GuidedConversation)
    }

    /// Swaps the demo script, e.g. when the panel reopens on another page.
    /// Only allowed while idle.
    pub fn set_demo_script(&mut self, demo: Arc<[DemoScenario]>) {
        if self.mode == Mode::Idle {
            self.demo = demo;
        }
    }

    /// Idle -> LiveChat when the panel opens.
    pub fn activate(&mut self, transcript: &mut Transcript, seed: Vec<MessageDraft>) -> bool {
        if self.mode != Mode::Idle {
            warn!(mode = %self.mode, "assistant panel already active");
            return false;
        }
        self.reset_cursors();
        transcript.replace_all(seed);
        self.set_mode(Mode::LiveChat);
        true
    }

    pub fn enter_demo(&mut self, transcript: &mut Transcript) -> bool {
        match self.mode {
            Mode::LiveChat | Mode::DemoPlayback => {}
            other => {
                debug!(mode = %other, "demo playback can only start from live chat");
                return false;
            }
        }
        self.cancel_timers();
        self.reset_cursors();
        transcript.replace_all(Vec::new());
        self.set_mode(Mode::DemoPlayback);
        true
    }

    /// Plays the next scripted user line and schedules its reply. No-op at the
    /// end of the script or while a reply is still pending.
    pub fn demo_input(&mut self, transcript: &mut Transcript) -> bool {
        if self.mode != Mode::DemoPlayback {
            return false;
        }
        if self.pending_demo_step.is_some() {
            debug!(step = self.demo_cursor, "demo reply still pending");
            return false;
        }
        let Some(scenario) = self.demo.get(self.demo_cursor) else {
            debug!(step = self.demo_cursor, "demo script exhausted");
            return false;
        };

        transcript.append(MessageDraft::user(scenario.user_input.clone()));
        self.pending_demo_step = Some(self.demo_cursor);
        self.demo_reply.schedule_once(
            self.timings.demo_reply_delay,
            self.inbound.clone(),
            |generation| InboundEvent::DemoReplyDue { generation },
        );
        true
    }

    pub fn on_demo_reply_due(&mut self, generation: u64, transcript: &mut Transcript) -> bool {
        if !self.demo_reply.complete(generation) {
            debug!(generation, "discarding stale demo reply");
            return false;
        }
        let Some(step) = self.pending_demo_step.take() else {
            return false;
        };
        if self.mode != Mode::DemoPlayback {
            return false;
        }
        let Some(scenario) = self.demo.get(step) else {
            return false;
        };

        self.demo_cursor = step + 1;
        let suggestions = if self.demo_cursor < self.demo.len() {
            vec![CONTINUE_DEMO]
        } else {
            vec![START_NEW_CONVERSATION, ENTER_CONVERSATION_MODE]
        };
        transcript.append(
            MessageDraft::assistant(scenario.response.clone()).with_suggestions(suggestions),
        );
        debug!(step = self.demo_cursor, total = self.demo.len(), "demo step played");
        true
    }

    /// Restarts in live chat from any active mode.
    pub fn start_new_conversation(
        &mut self,
        transcript: &mut Transcript,
        seed: Vec<MessageDraft>,
    ) -> bool {
        if self.mode == Mode::Idle {
            return false;
        }
        self.return_to_live(transcript, seed);
        true
    }

    pub fn enter_guided(&mut self, transcript: &mut Transcript) -> bool {
        if self.mode == Mode::Idle {
            return false;
        }
        if self.conversation.is_empty() {
            warn!("guided conversation script is empty");
            return false;
        }
        self.cancel_timers();
        self.reset_cursors();
        transcript.replace_all(Vec::new());
        self.append_guided_step(transcript, 0);
        self.set_mode(Mode::GuidedConversation);
        true
    }

    /// Starts the autoplay ticker. A second call while it runs does nothing.
    pub fn start_autoplay(&mut self) -> bool {
        if self.mode != Mode::GuidedConversation || self.autoplay.is_active() {
            return false;
        }
        if self.guided_at_last() {
            debug!("guided conversation already at last step");
            return false;
        }
        self.autoplay.schedule_every(
            self.timings.autoplay_interval,
            self.inbound.clone(),
            |generation| InboundEvent::AutoplayTick { generation },
        );
        info!(step = self.guided_cursor, "guided autoplay started");
        true
    }

    pub fn stop_autoplay(&mut self) -> bool {
        let stopped = self.autoplay.cancel();
        if stopped {
            info!(step = self.guided_cursor, "guided autoplay stopped");
        }
        stopped
    }

    pub fn on_autoplay_tick(&mut self, generation: u64, transcript: &mut Transcript) -> bool {
        if !self.autoplay.accepts(generation) || self.mode != Mode::GuidedConversation {
            debug!(generation, "discarding stale autoplay tick");
            return false;
        }
        if self.guided_at_last() {
            self.stop_autoplay();
            return false;
        }
        self.advance_guided(transcript);
        true
    }

    /// Manual advance. At the last step this leaves guided mode.
    pub fn guided_next(&mut self, transcript: &mut Transcript, seed: Vec<MessageDraft>) -> bool {
        if self.mode != Mode::GuidedConversation {
            return false;
        }
        if self.guided_at_last() {
            self.return_to_live(transcript, seed);
        } else {
            self.advance_guided(transcript);
        }
        true
    }

    pub fn guided_reset(&mut self, transcript: &mut Transcript) -> bool {
        if self.mode != Mode::GuidedConversation {
            return false;
        }
        self.stop_autoplay();
        self.guided_cursor = 0;
        transcript.replace_all(Vec::new());
        self.append_guided_step(transcript, 0);
        true
    }

    pub fn exit_guided(&mut self, transcript: &mut Transcript, seed: Vec<MessageDraft>) -> bool {
        if self.mode != Mode::GuidedConversation {
            return false;
        }
        self.return_to_live(transcript, seed);
        true
    }

    /// Leaves a scripted mode so a live turn can follow. Returns whether a
    /// transition happened.
    pub fn leave_scripted(&mut self, transcript: &mut Transcript, seed: Vec<MessageDraft>) -> bool {
        if !self.is_scripted() {
            return false;
        }
        self.return_to_live(transcript, seed);
        true
    }

    /// Panel closed: cancel everything and go back to idle.
    pub fn shutdown(&mut self) {
        self.cancel_timers();
        self.reset_cursors();
        self.set_mode(Mode::Idle);
    }

    fn return_to_live(&mut self, transcript: &mut Transcript, seed: Vec<MessageDraft>) {
        self.cancel_timers();
        self.reset_cursors();
        transcript.replace_all(seed);
        self.set_mode(Mode::LiveChat);
    }

    fn guided_at_last(&self) -> bool {
        self.guided_cursor + 1 >= self.conversation.len()
    }

    fn advance_guided(&mut self, transcript: &mut Transcript) {
        if self.guided_at_last() {
            return;
        }
        self.guided_cursor += 1;
        self.append_guided_step(transcript, self.guided_cursor);
        debug!(step = self.guided_cursor, "guided conversation advanced");
        if self.guided_at_last() {
            self.stop_autoplay();
        }
    }

    fn append_guided_step(&self, transcript: &mut Transcript, index: usize) {
        let Some(step) = self.conversation.get(index) else {
            return;
        };
        transcript.append(MessageDraft::user(step.user.clone()));
        let reply = MessageDraft::assistant(step.kognii.clone());
        if index + 1 == self.conversation.len() {
            transcript.append(reply.with_suggestions([START_NEW_CONVERSATION]));
        } else {
            transcript.append(reply);
        }
    }

    fn cancel_timers(&mut self) {
        self.demo_reply.cancel();
        self.pending_demo_step = None;
        self.stop_autoplay();
    }

    fn reset_cursors(&mut self) {
        self.demo_cursor = 0;
        self.guided_cursor = 0;
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "assistant mode changed");
            self.mode = mode;
        }
    }
}

#[cfg(test)]
#[path = "tests/mode_tests.rs"]
mod tests;
