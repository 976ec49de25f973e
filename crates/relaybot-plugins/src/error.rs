use relaybot_channels::ChannelError;
use relaybot_sessions::SessionError;
use relaybot_settings::SettingsError;
use thiserror::Error;

/// Failure inside one handler. The pipeline logs it and moves on.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The handler returned an unrecoverable failure.
    #[error("Handler execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, PluginError>;

/// Failure that aborts processing of a single inbound message.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("settings lookup failed: {0}")]
    Settings(#[from] SettingsError),

    #[error("session lookup failed: {0}")]
    Session(#[from] SessionError),

    #[error("reply delivery failed: {0}")]
    Delivery(#[from] ChannelError),

    #[error("Dispatch timed out after {ms}ms")]
    Timeout { ms: u64 },
}
