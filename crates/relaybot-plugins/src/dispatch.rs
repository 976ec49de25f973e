use std::sync::Arc;
use std::time::Duration;

use relaybot_channels::ReplySender;
use relaybot_core::config::DEFAULT_DISPATCH_TIMEOUT_SECS;
use relaybot_core::types::Message;
use relaybot_sessions::AiSessionManager;
use relaybot_settings::SettingsResolver;
use tracing::{debug, info, instrument, warn};

use crate::context::MessageContext;
use crate::engine::Pipeline;
use crate::error::DispatchError;
use crate::types::PipelineOutcome;

/// Terminal state of one dispatch that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler answered and the reply was delivered.
    Replied { handler: String },
    /// No handler claimed the message. Not an error.
    Unhandled,
}

/// Runs one inbound message through settings, session lookup and the pipeline,
/// then delivers the single reply.
pub struct Dispatcher {
    resolver: Arc<SettingsResolver>,
    sessions: Arc<AiSessionManager>,
    pipeline: Arc<Pipeline>,
    sender: Arc<dyn ReplySender>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        resolver: Arc<SettingsResolver>,
        sessions: Arc<AiSessionManager>,
        pipeline: Arc<Pipeline>,
        sender: Arc<dyn ReplySender>,
    ) -> Self {
        Self {
            resolver,
            sessions,
            pipeline,
            sender,
            timeout: Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Process one message. Failures affect this message only.
    pub async fn dispatch(&self, message: Message) -> Result<DispatchOutcome, DispatchError> {
        let msg_id = message.id.clone();
        match tokio::time::timeout(self.timeout, self.dispatch_inner(message)).await {
            Ok(result) => result,
            Err(_) => {
                let ms = self.timeout.as_millis() as u64;
                warn!(msg_id = %msg_id, timeout_ms = ms, "dispatch timed out");
                Err(DispatchError::Timeout { ms })
            }
        }
    }

    async fn dispatch_inner(&self, message: Message) -> Result<DispatchOutcome, DispatchError> {
        let settings = self.resolver.resolve(&message.room_id).await?;
        let session = self.sessions.state(&message).await?;

        let ctx = MessageContext {
            message,
            settings,
            session,
            sessions: Arc::clone(&self.sessions),
        };

        match self.pipeline.dispatch(&ctx).await {
            PipelineOutcome::Handled { handler, reply } => {
                let message = &ctx.message;
                let at_user = (!message.is_direct()).then_some(message.sender_id.as_str());
                self.sender
                    .send_text(message.reply_target(), &reply, at_user)
                    .await?;
                info!(handler = %handler, target = %message.reply_target(), "reply sent");
                Ok(DispatchOutcome::Replied { handler })
            }
            PipelineOutcome::NotMatched => {
                debug!(msg_id = %ctx.message.id, "no handler matched");
                Ok(DispatchOutcome::Unhandled)
            }
        }
    }

    /// Drop every AI session in a room the bot has left.
    #[instrument(skip(self))]
    pub async fn remove_room(&self, room_id: &str) -> Result<usize, DispatchError> {
        Ok(self.sessions.expire_all_for_room(room_id).await?)
    }
}
