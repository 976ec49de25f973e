use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    /// The backing store could not be reached or returned an I/O failure.
    #[error("settings store unavailable: {0}")]
    StoreUnavailable(String),

    /// No settings row is reachable for a lookup that requires one.
    #[error("settings not configured: {0}")]
    NotConfigured(String),

    /// The broadcast-mention pattern did not compile.
    #[error("invalid broadcast pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
