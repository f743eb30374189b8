//! Events flowing into and out of the assistant panel.

use shared::domain::SessionId;

use crate::{bridge::BridgeEvent, mode::Mode};

/// Work queued for the panel owner by timers and injected collaborators.
/// Timer events carry the generation of the task that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    DemoReplyDue { generation: u64 },
    AutoplayTick { generation: u64 },
    ScrollDue { generation: u64 },
    Bridge(BridgeEvent),
}

/// Notifications for the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    TranscriptChanged { len: usize },
    ScrollToLatest,
    ThinkingChanged(bool),
    ModeChanged(Mode),
    AutoplayChanged(bool),
    SessionOpened(SessionId),
    SessionClosed,
}
