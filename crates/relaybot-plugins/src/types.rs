use async_trait::async_trait;

use crate::context::MessageContext;
use crate::error::Result;

/// What a handler's `run` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler matched and produced this reply.
    Handled(String),
    /// The message is not for this handler.
    NotMatched,
}

/// Result of running the whole pipeline over one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Handled { handler: String, reply: String },
    NotMatched,
}

/// A message plugin.
///
/// Handlers are tried in registration order and the first one whose `run`
/// returns [`HandlerOutcome::Handled`] wins. `run` does its own content
/// matching.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Unique name used in logs and for disabling via config.
    fn name(&self) -> &str;

    fn labels(&self) -> &[&'static str] {
        &[]
    }

    /// Cheap gate checked before `run`. Returning `false` skips the handler.
    async fn pre_action(&self, _ctx: &MessageContext) -> bool {
        true
    }

    async fn run(&self, ctx: &MessageContext) -> Result<HandlerOutcome>;

    /// Called only after `run` handled the message.
    async fn post_action(&self, _ctx: &MessageContext) {}
}
