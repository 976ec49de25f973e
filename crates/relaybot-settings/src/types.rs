use serde::{Deserialize, Serialize};

/// Completion endpoint and model selection for one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub workflow_model: String,
    pub image_recognition_model: String,
    pub prompt: String,
    /// Zero means "no limit".
    pub max_completion_tokens: u32,
    pub image_model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatConfig {
    pub enabled: bool,
    pub pat_type: Option<String>,
    pub text: Option<String>,
    pub voice_timbre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WelcomeConfig {
    pub enabled: bool,
    pub welcome_type: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveAlertConfig {
    pub enabled: bool,
    pub text: Option<String>,
}

/// Fully merged view of global and room settings for a single message.
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectiveSettings {
    pub ai_chat_enabled: bool,
    pub ai_trigger_word: Option<String>,
    pub ai_drawing_enabled: bool,
    pub tts_enabled: bool,
    pub pat: PatConfig,
    pub ai: AiConfig,
}
