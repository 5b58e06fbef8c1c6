//! Conversation orchestration
//!
//! This module holds the conversation log and the orchestrator that reacts to
//! recognizer events and backend responses:
//! - [`types`]: chat message types
//! - [`store`]: thread-safe append-only message log
//! - [`state`]: transient session state (listening/processing/transcript)
//! - [`orchestrator`]: the request/response flow for one conversation turn
//! - [`session`]: worker thread and command/event surface

pub mod orchestrator;
pub mod session;
pub mod state;
pub mod store;
pub mod types;

pub use orchestrator::Conversation;
pub use session::{PlaybackFactory, Session, SessionCommand, SessionEvent, SessionHandle};
pub use state::{SessionState, SessionStateSnapshot, SharedSessionState};
pub use store::MessageStore;
pub use types::{Message, Sender};
