use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{error::ChannelError, sender::ReplySender, types::OutboundMessage};

/// Keeps every reply in memory. Handy for tests and dry runs.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, oldest first.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_text(&self, target_id: &str, text: &str, at_user_id: Option<&str>) -> Result<(), ChannelError> {
        self.sent
            .lock()
            .await
            .push(OutboundMessage::new(target_id, text, at_user_id));
        Ok(())
    }
}
