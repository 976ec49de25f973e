use serde::{Deserialize, Serialize};

/// A text reply on its way back to the chat backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Room id, or the sender id for direct messages.
    pub target_id: String,

    pub content: String,

    /// Member to @-mention in a room reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_user_id: Option<String>,

    /// RFC3339 timestamp of when the reply was produced.
    pub sent_at: String,
}

impl OutboundMessage {
    pub fn new(target_id: &str, content: &str, at_user_id: Option<&str>) -> Self {
        Self {
            target_id: target_id.to_string(),
            content: content.to_string(),
            at_user_id: at_user_id.map(str::to_string),
            sent_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
