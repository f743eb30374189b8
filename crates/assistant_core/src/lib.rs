//! Conversation orchestrator for the dashboard assistant panel.
//!
//! [`AssistantPanel`] ties together the session gateway, the transcript, the
//! mode controller, quick actions and suggestion routing.

pub mod bridge;
pub mod context;
pub mod error;
pub mod events;
pub mod gateway;
pub mod mode;
pub mod panel;
pub mod quick_action;
pub mod script;
pub mod settings;
pub mod suggestion;
pub mod timer;
pub mod transcript;

pub use bridge::{AssistantBridge, BridgeHandle};
pub use context::{PageContext, PageKind};
pub use error::{AssistantError, BackendError};
pub use events::{InboundEvent, PanelEvent};
pub use gateway::{ChatBackend, HttpChatBackend, Session, SessionGateway};
pub use mode::Mode;
pub use panel::AssistantPanel;
pub use quick_action::{ActionIcon, QuickAction};
pub use script::ScriptLibrary;
pub use settings::AssistantSettings;
pub use transcript::{Message, MessageDraft};
