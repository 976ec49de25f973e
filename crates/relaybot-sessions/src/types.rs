use relaybot_core::types::Message;
use serde::{Deserialize, Serialize};

const KEY_PREFIX: &str = "ai_chat_session_";

/// Key of one AI chat session: a sender inside a room.
///
/// Direct messages use an empty room id, so each sender gets a single
/// DM session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub room_id: String,
    pub sender_id: String,
}

impl SessionKey {
    pub fn new(room_id: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            sender_id: sender_id.into(),
        }
    }

    pub fn from_message(message: &Message) -> Self {
        Self::new(message.room_id.as_str(), message.sender_id.as_str())
    }

    /// Return the canonical store key.
    ///
    /// Format: `ai_chat_session_{room_id}:{sender_id}`
    pub fn format(&self) -> String {
        format!("{}{}", Self::prefix_for_room(&self.room_id), self.sender_id)
    }

    /// Prefix shared by every session key in `room_id`.
    pub fn prefix_for_room(room_id: &str) -> String {
        format!("{KEY_PREFIX}{room_id}:")
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoSession,
    Active,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Active)
    }
}
