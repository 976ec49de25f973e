use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RelaybotError, Result};

/// Backend message type codes.
///
/// Serialized as the raw numeric code so decoded webhook payloads map 1-to-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    Voice,
    Verify,
    PossibleFriend,
    ShareCard,
    Video,
    Emoticon,
    Location,
    App,
    Voip,
    Init,
    VoipNotify,
    VoipInvite,
    MicroVideo,
    Prompt,
    System,
    Unknown(u32),
}

impl MessageType {
    pub fn code(self) -> u32 {
        match self {
            MessageType::Text => 1,
            MessageType::Image => 3,
            MessageType::Voice => 34,
            MessageType::Verify => 37,
            MessageType::PossibleFriend => 40,
            MessageType::ShareCard => 42,
            MessageType::Video => 43,
            MessageType::Emoticon => 47,
            MessageType::Location => 48,
            MessageType::App => 49,
            MessageType::Voip => 50,
            MessageType::Init => 51,
            MessageType::VoipNotify => 52,
            MessageType::VoipInvite => 53,
            MessageType::MicroVideo => 62,
            MessageType::Prompt => 10000,
            MessageType::System => 10002,
            MessageType::Unknown(code) => code,
        }
    }
}

impl From<u32> for MessageType {
    fn from(code: u32) -> Self {
        match code {
            1 => MessageType::Text,
            3 => MessageType::Image,
            34 => MessageType::Voice,
            37 => MessageType::Verify,
            40 => MessageType::PossibleFriend,
            42 => MessageType::ShareCard,
            43 => MessageType::Video,
            47 => MessageType::Emoticon,
            48 => MessageType::Location,
            49 => MessageType::App,
            50 => MessageType::Voip,
            51 => MessageType::Init,
            52 => MessageType::VoipNotify,
            53 => MessageType::VoipInvite,
            62 => MessageType::MicroVideo,
            10000 => MessageType::Prompt,
            10002 => MessageType::System,
            other => MessageType::Unknown(other),
        }
    }
}

impl From<MessageType> for u32 {
    fn from(t: MessageType) -> Self {
        t.code()
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Sub-type code carried by app messages (`<appmsg><type>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum AppMsgType {
    Link,
    File,
    Location,
    MiniProgram,
    Quote,
    AttachmentUploading,
    Transfer,
    RedEnvelope,
    Other(u32),
}

impl AppMsgType {
    pub fn code(self) -> u32 {
        match self {
            AppMsgType::Link => 5,
            AppMsgType::File => 6,
            AppMsgType::Location => 33,
            AppMsgType::MiniProgram => 51,
            AppMsgType::Quote => 57,
            AppMsgType::AttachmentUploading => 74,
            AppMsgType::Transfer => 2000,
            AppMsgType::RedEnvelope => 2001,
            AppMsgType::Other(code) => code,
        }
    }
}

impl From<u32> for AppMsgType {
    fn from(code: u32) -> Self {
        match code {
            5 => AppMsgType::Link,
            6 => AppMsgType::File,
            // 36 is the newer location share variant
            33 | 36 => AppMsgType::Location,
            51 => AppMsgType::MiniProgram,
            57 => AppMsgType::Quote,
            74 => AppMsgType::AttachmentUploading,
            2000 => AppMsgType::Transfer,
            2001 => AppMsgType::RedEnvelope,
            other => AppMsgType::Other(other),
        }
    }
}

impl From<AppMsgType> for u32 {
    fn from(t: AppMsgType) -> Self {
        t.code()
    }
}

/// A single inbound chat message, already decoded by the ingestion layer.
///
/// Read-only for the duration of one dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    /// Empty for direct messages.
    #[serde(default)]
    pub room_id: String,
    pub sender_id: String,
    #[serde(default)]
    pub is_chat_room: bool,
    #[serde(default)]
    pub is_at_me: bool,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub msg_type: MessageType,
    #[serde(default)]
    pub app_msg_type: Option<AppMsgType>,
    /// Unix seconds.
    #[serde(default)]
    pub created_at: i64,
}

impl Message {
    /// A plain text message posted in a group room.
    pub fn room(room_id: impl Into<String>, sender_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            room_id: room_id.into(),
            sender_id: sender_id.into(),
            is_chat_room: true,
            is_at_me: false,
            content: content.into(),
            msg_type: MessageType::Text,
            app_msg_type: None,
            created_at: Utc::now().timestamp(),
        }
    }

    /// A plain text direct message.
    pub fn direct(sender_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            is_chat_room: false,
            ..Self::room("", sender_id, content)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_at_me(mut self, is_at_me: bool) -> Self {
        self.is_at_me = is_at_me;
        self
    }

    pub fn with_type(mut self, msg_type: MessageType, app_msg_type: Option<AppMsgType>) -> Self {
        self.msg_type = msg_type;
        self.app_msg_type = app_msg_type;
        self
    }

    pub fn is_direct(&self) -> bool {
        self.room_id.is_empty()
    }

    /// Where replies to this message are delivered: the room, or the sender for DMs.
    pub fn reply_target(&self) -> &str {
        if self.is_direct() {
            &self.sender_id
        } else {
            &self.room_id
        }
    }

    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_at, 0).single()
    }

    /// Decode one JSON line produced by the ingestion layer.
    pub fn from_json(line: &str) -> Result<Self> {
        let msg: Message = serde_json::from_str(line)?;
        if msg.sender_id.is_empty() {
            return Err(RelaybotError::InvalidMessage("sender_id must not be empty".into()));
        }
        if msg.is_chat_room && msg.room_id.is_empty() {
            return Err(RelaybotError::InvalidMessage("room message without room_id".into()));
        }
        Ok(msg)
    }
}
