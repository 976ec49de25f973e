use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{error::ChannelError, sender::ReplySender, types::OutboundMessage};

/// Writes each reply as one JSON line.
///
/// Used by the gateway binary when replaying captured traffic; the writer is
/// stdout unless one is supplied.
pub struct StdoutSender<W = tokio::io::Stdout> {
    out: Mutex<W>,
}

impl StdoutSender {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for StdoutSender {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: AsyncWrite + Unpin + Send> StdoutSender<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> ReplySender for StdoutSender<W> {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn send_text(&self, target_id: &str, text: &str, at_user_id: Option<&str>) -> Result<(), ChannelError> {
        let msg = OutboundMessage::new(target_id, text, at_user_id);
        let mut line = serde_json::to_vec(&msg).map_err(|e| ChannelError::SendFailed(e.to_string()))?;
        line.push(b'\n');

        // hold the lock across write+flush so concurrent replies never interleave
        let mut out = self.out.lock().await;
        out.write_all(&line)
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        debug!(target = %target_id, len = text.len(), "reply written");
        Ok(())
    }
}
