//! Rule-based conversational assistant for a university-admissions platform.
//!
//! The engine is a deterministic, auditable rule table, not a learning
//! system: free-text input is classified into a fixed topic set, checked
//! against the session's utterance history for repeats, scanned for a
//! self-introduced name, and answered from canned per-topic templates. A
//! small session store persists the message log for the lifetime of one
//! browsing session.
//!
//! The host UI talks to exactly one type, [`Controller`]: it feeds raw text
//! in through [`Controller::submit`] and drains [`UiEvent`]s back out.

pub mod compose;
mod controller;
pub mod intent;
pub mod name;
pub mod repeat;
mod state;
mod store;

pub use compose::Reply;
pub use controller::{Controller, SubmitOutcome, UiEvent};
pub use intent::Category;
pub use state::{ConversationState, Message, WELCOME_TEXT};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

/// Internal error type for the assistant's fallible plumbing.
///
/// Nothing here ever reaches the user: persistence failures are logged and
/// the conversation continues in memory, and an unreadable saved session is
/// treated as no saved session at all.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed chat history: {0}")]
    Malformed(#[from] serde_json::Error),
}
