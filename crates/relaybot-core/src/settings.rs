use serde::{Deserialize, Serialize};

/// Process-wide defaults (single row).
///
/// Every field is optional; an absent or empty value means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub chat_ai_enabled: Option<bool>,
    pub chat_ai_trigger: Option<String>,
    pub chat_base_url: Option<String>,
    pub chat_api_key: Option<String>,
    pub chat_model: Option<String>,
    pub workflow_model: Option<String>,
    pub image_recognition_model: Option<String>,
    pub chat_prompt: Option<String>,
    pub max_completion_tokens: Option<u32>,
    pub image_ai_enabled: Option<bool>,
    pub image_model: Option<String>,
    pub tts_enabled: Option<bool>,
    pub pat_enabled: Option<bool>,
    pub pat_type: Option<String>,
    pub pat_text: Option<String>,
    pub pat_voice_timbre: Option<String>,
    pub welcome_enabled: Option<bool>,
    pub welcome_type: Option<String>,
    pub welcome_text: Option<String>,
    pub welcome_url: Option<String>,
    pub leave_chat_room_alert_enabled: Option<bool>,
    pub leave_chat_room_alert_text: Option<String>,
}

/// Per-room overrides. Present fields win over [`GlobalSettings`] field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSettings {
    /// Zero until the row has been persisted.
    pub id: u64,
    pub chat_room_id: String,
    pub chat_ai_enabled: Option<bool>,
    pub chat_ai_trigger: Option<String>,
    pub chat_base_url: Option<String>,
    pub chat_api_key: Option<String>,
    pub chat_model: Option<String>,
    pub workflow_model: Option<String>,
    pub image_recognition_model: Option<String>,
    pub chat_prompt: Option<String>,
    pub max_completion_tokens: Option<u32>,
    pub image_ai_enabled: Option<bool>,
    pub image_model: Option<String>,
    pub tts_enabled: Option<bool>,
    pub pat_enabled: Option<bool>,
    pub pat_type: Option<String>,
    pub pat_text: Option<String>,
    pub pat_voice_timbre: Option<String>,
    pub welcome_enabled: Option<bool>,
    pub welcome_type: Option<String>,
    pub welcome_text: Option<String>,
    pub welcome_url: Option<String>,
    pub leave_chat_room_alert_enabled: Option<bool>,
    pub leave_chat_room_alert_text: Option<String>,
}

impl RoomSettings {
    /// Row created the first time a room is seen: AI chat on, triggered by `trigger_word`.
    pub fn initial(chat_room_id: impl Into<String>, trigger_word: impl Into<String>) -> Self {
        Self {
            chat_room_id: chat_room_id.into(),
            chat_ai_enabled: Some(true),
            chat_ai_trigger: Some(trigger_word.into()),
            ..Default::default()
        }
    }
}

/// A string field counts as set only when it is present and non-empty.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
