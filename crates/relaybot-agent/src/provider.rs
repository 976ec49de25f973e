use async_trait::async_trait;
use relaybot_settings::AiConfig;
use serde::{Deserialize, Serialize};

/// A single message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

/// Chat completion backend.
///
/// The endpoint, key and model come from the per-message [`AiConfig`], so one
/// completer serves every room.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Send `messages` and return the first choice's text.
    ///
    /// The configured system prompt is prepended by the implementation.
    async fn complete(&self, config: &AiConfig, messages: Vec<ChatMessage>) -> Result<String, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// A required setting is missing; the payload is the user-facing notice.
    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("empty completion")]
    EmptyResponse,

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Short status text safe to send back to a chat.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::NotConfigured(notice) => notice.clone(),
            ProviderError::EmptyResponse => "AI返回了空内容，请联系管理员".to_string(),
            _ => "AI服务调用失败，请稍后再试".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("be brief")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"be brief"}"#);
    }

    #[test]
    fn user_messages_hide_internals() {
        let err = ProviderError::Api {
            status: 500,
            message: "stack trace here".into(),
        };
        assert_eq!(err.user_message(), "AI服务调用失败，请稍后再试");
        assert_eq!(ProviderError::EmptyResponse.user_message(), "AI返回了空内容，请联系管理员");
        assert_eq!(
            ProviderError::NotConfigured("AI Model 未配置，请联系管理员".into()).user_message(),
            "AI Model 未配置，请联系管理员"
        );
    }
}
