//! Session store — persists and restores the message log for one session.
//!
//! The store is injected into the conversation controller rather than being
//! touched as a global. Its surface never returns errors: a load failure of
//! any kind means "no saved state", and a save failure is logged and dropped
//! so the conversation keeps going in memory.

use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::state::{ConversationState, Message};
use crate::AssistantError;

/// Persistence contract for the session's message log.
pub trait SessionStore: Send + Sync {
    /// Restore the previous state, or `None` when nothing valid is saved.
    fn load(&self) -> Option<ConversationState>;
    /// Persist the current message log. Best-effort.
    fn save(&self, state: &ConversationState);
    /// Erase the persisted record. Called once on session end.
    fn clear(&self);
}

/// Session store backed by a single JSON file holding the message array.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_log(&self) -> Result<Vec<Message>, AssistantError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_log(&self, messages: &[Message]) -> Result<(), AssistantError> {
        let bytes = serde_json::to_vec(messages)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<ConversationState> {
        match self.read_log() {
            Ok(messages) if !messages.is_empty() => {
                Some(ConversationState::from_messages(messages))
            }
            Ok(_) => None,
            Err(AssistantError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("discarding unreadable chat history: {}", e);
                None
            }
        }
    }

    fn save(&self, state: &ConversationState) {
        if let Err(e) = self.write_log(state.messages()) {
            tracing::warn!("failed to persist chat history: {}", e);
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to clear chat history: {}", e),
        }
    }
}

/// In-memory session store holding the serialized record, for tests and
/// hosts that keep the record elsewhere.
pub struct MemorySessionStore {
    record: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(None),
        }
    }

    /// Start from a pre-existing serialized record.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<ConversationState> {
        let guard = self.record.lock();
        let record = guard.as_deref()?;
        match serde_json::from_str::<Vec<Message>>(record) {
            Ok(messages) if !messages.is_empty() => {
                Some(ConversationState::from_messages(messages))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("discarding unreadable chat history: {}", e);
                None
            }
        }
    }

    fn save(&self, state: &ConversationState) {
        match serde_json::to_string(state.messages()) {
            Ok(record) => *self.record.lock() = Some(record),
            Err(e) => tracing::warn!("failed to persist chat history: {}", e),
        }
    }

    fn clear(&self) {
        *self.record.lock() = None;
    }
}
