//! Scoped timers that report back through the panel's inbound channel.
//!
//! A [`TimerSlot`] owns at most one spawned task. Rescheduling or cancelling
//! aborts the previous task, and so does dropping the slot. Each scheduled task
//! is stamped with a generation number that travels with its events, so the
//! owner can discard events that were already queued when the task was
//! cancelled.

use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::trace;

use crate::events::InboundEvent;

pub type InboundSender = UnboundedSender<InboundEvent>;

pub struct TimerSlot {
    label: &'static str,
    generation: u64,
    active: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            generation: 0,
            active: None,
        }
    }

    /// Fires `make_event` once after `delay`, replacing any pending task.
    pub fn schedule_once<F>(&mut self, delay: Duration, tx: InboundSender, make_event: F) -> u64
    where
        F: FnOnce(u64) -> InboundEvent + Send + 'static,
    {
        self.abort_active();
        self.generation += 1;
        let generation = self.generation;
        trace!(timer = self.label, generation, ?delay, "scheduling one-shot timer");

        self.active = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(make_event(generation));
        }));
        generation
    }

    /// Fires `make_event` every `period`, first tick one period from now.
    /// Replaces any pending task.
    pub fn schedule_every<F>(&mut self, period: Duration, tx: InboundSender, make_event: F) -> u64
    where
        F: Fn(u64) -> InboundEvent + Send + 'static,
    {
        self.abort_active();
        self.generation += 1;
        let generation = self.generation;
        trace!(timer = self.label, generation, ?period, "scheduling periodic timer");

        self.active = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(make_event(generation)).is_err() {
                    break;
                }
            }
        }));
        generation
    }

    /// Cancels the pending task. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active.is_some();
        self.abort_active();
        if was_active {
            // Invalidate anything the aborted task already queued.
            self.generation += 1;
            trace!(timer = self.label, "timer cancelled");
        }
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether an event stamped with `generation` belongs to the live task.
    pub fn accepts(&self, generation: u64) -> bool {
        self.active.is_some() && self.generation == generation
    }

    /// Consumes the event of a one-shot task. Returns false for stale events.
    pub fn complete(&mut self, generation: u64) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.active = None;
        true
    }

    fn abort_active(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.abort_active();
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
