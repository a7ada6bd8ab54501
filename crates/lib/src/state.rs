use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seed message for a fresh session.
pub const WELCOME_TEXT: &str = "Hi! I'm your Gradlink assistant. I'm here to help you with \
     university applications, course selection, accommodation, and all things related to \
     Gradlink's services. How can I assist you today?";

/// One entry in the conversation log. Never mutated after creation.
///
/// Serializes with camelCase keys and ISO-8601 timestamps so the persisted
/// record matches what a web host expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Strictly increasing across the session.
    pub id: u64,
    pub text: String,
    pub is_from_user: bool,
    pub created_at: DateTime<Utc>,
}

/// The full conversational state of one session.
///
/// Owns the ordered message log, the raw user-utterance history (used only
/// for repetition tracking), and the sticky user name. Only the conversation
/// controller mutates this.
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<Message>,
    history: Vec<String>,
    known_name: Option<String>,
    next_id: u64,
}

impl ConversationState {
    /// Fresh state holding exactly the welcome message.
    pub fn seeded() -> Self {
        Self {
            messages: vec![Message {
                id: 1,
                text: WELCOME_TEXT.to_string(),
                is_from_user: false,
                created_at: Utc::now(),
            }],
            history: Vec::new(),
            known_name: None,
            next_id: 2,
        }
    }

    /// Rehydrate from a persisted message log.
    ///
    /// The utterance history is rebuilt from the user-authored messages and
    /// the id counter resumes past the highest persisted id. The known name
    /// is not persisted, so it restarts unset.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let history = messages
            .iter()
            .filter(|m| m.is_from_user)
            .map(|m| m.text.clone())
            .collect();
        let next_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        Self {
            messages,
            history,
            known_name: None,
            next_id,
        }
    }

    /// Append a user message and record the raw utterance in the history.
    pub fn push_user(&mut self, text: &str) -> Message {
        self.history.push(text.to_string());
        self.push(text, true)
    }

    /// Append an assistant message.
    pub fn push_assistant(&mut self, text: &str) -> Message {
        self.push(text, false)
    }

    fn push(&mut self, text: &str, is_from_user: bool) -> Message {
        let message = Message {
            id: self.next_id,
            text: text.to_string(),
            is_from_user,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    /// Commit a freshly extracted name. The first successful commit wins;
    /// later candidates are ignored. Returns whether the name was taken.
    pub fn note_name(&mut self, name: &str) -> bool {
        if self.known_name.is_some() {
            return false;
        }
        self.known_name = Some(name.to_string());
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn known_name(&self) -> Option<&str> {
        self.known_name.as_deref()
    }
}
