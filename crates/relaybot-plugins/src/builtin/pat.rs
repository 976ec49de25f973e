use async_trait::async_trait;
use relaybot_core::types::MessageType;
use relaybot_core::xml::decode_sys_msg;
use tracing::debug;

use crate::context::MessageContext;
use crate::error::Result;
use crate::types::{HandlerOutcome, MessageHandler};

/// Answers a "pat" aimed at the bot with the configured text.
///
/// The ingestion layer flags pats that target the bot with `is_at_me`. Only
/// the text reply type is served; voice replies need TTS and are skipped.
pub struct Pat;

#[async_trait]
impl MessageHandler for Pat {
    fn name(&self) -> &str {
        "Pat"
    }

    fn labels(&self) -> &[&'static str] {
        &["pat", "interaction"]
    }

    async fn pre_action(&self, ctx: &MessageContext) -> bool {
        ctx.message.msg_type == MessageType::System && ctx.message.is_at_me && ctx.settings.pat_config().enabled
    }

    async fn run(&self, ctx: &MessageContext) -> Result<HandlerOutcome> {
        match decode_sys_msg(&ctx.message.content) {
            Ok(env) if env.kind() == "pat" => {}
            _ => return Ok(HandlerOutcome::NotMatched),
        }

        let config = ctx.settings.pat_config();
        match config.pat_type.as_deref() {
            None | Some("") | Some("text") => {}
            Some(other) => {
                debug!(pat_type = other, "pat reply type not served");
                return Ok(HandlerOutcome::NotMatched);
            }
        }

        match config.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(HandlerOutcome::Handled(text.to_string())),
            _ => Ok(HandlerOutcome::NotMatched),
        }
    }
}
