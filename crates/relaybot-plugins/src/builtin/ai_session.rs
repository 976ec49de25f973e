use async_trait::async_trait;

use crate::context::MessageContext;
use crate::error::Result;
use crate::types::{HandlerOutcome, MessageHandler};

/// Opens an AI session on the exact start token.
pub struct AiSessionStart;

#[async_trait]
impl MessageHandler for AiSessionStart {
    fn name(&self) -> &str {
        "AiSessionStart"
    }

    fn labels(&self) -> &[&'static str] {
        &["ai", "session"]
    }

    async fn pre_action(&self, ctx: &MessageContext) -> bool {
        ctx.settings.is_ai_chat_enabled()
    }

    async fn run(&self, ctx: &MessageContext) -> Result<HandlerOutcome> {
        if ctx.sessions.is_session_start(&ctx.message).await? {
            return Ok(HandlerOutcome::Handled(ctx.sessions.start_tips()));
        }
        Ok(HandlerOutcome::NotMatched)
    }
}

/// Closes the sender's AI session on the exact end token.
pub struct AiSessionEnd;

#[async_trait]
impl MessageHandler for AiSessionEnd {
    fn name(&self) -> &str {
        "AiSessionEnd"
    }

    fn labels(&self) -> &[&'static str] {
        &["ai", "session"]
    }

    async fn pre_action(&self, ctx: &MessageContext) -> bool {
        ctx.settings.is_ai_chat_enabled()
    }

    async fn run(&self, ctx: &MessageContext) -> Result<HandlerOutcome> {
        if ctx.sessions.is_session_end(&ctx.message).await? {
            return Ok(HandlerOutcome::Handled(ctx.sessions.end_tips()));
        }
        Ok(HandlerOutcome::NotMatched)
    }
}
