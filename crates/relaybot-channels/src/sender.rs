use async_trait::async_trait;

use crate::error::ChannelError;

/// Outbound side of the chat backend.
///
/// Implementations must be `Send + Sync` so one sender can serve every
/// concurrent dispatch task.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Stable lowercase identifier used in logs.
    fn name(&self) -> &str;

    /// Deliver `text` to `target_id`, optionally @-mentioning a room member.
    async fn send_text(&self, target_id: &str, text: &str, at_user_id: Option<&str>) -> Result<(), ChannelError>;
}
