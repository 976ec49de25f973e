use thiserror::Error;

/// Errors raised while delivering a reply.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying transport is gone (closed pipe, dropped socket).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A message could not be delivered to the remote endpoint.
    #[error("Send failed: {0}")]
    SendFailed(String),
}
