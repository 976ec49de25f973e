use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelaybotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RelaybotError {
    /// Short error code string used in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            RelaybotError::Config(_) => "CONFIG_ERROR",
            RelaybotError::InvalidMessage(_) => "INVALID_MESSAGE",
            RelaybotError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, RelaybotError>;
