use std::sync::Arc;

use async_trait::async_trait;
use relaybot_agent::{ChatCompleter, ChatMessage};
use relaybot_core::types::{AppMsgType, MessageType};
use tracing::{debug, warn};

use crate::context::MessageContext;
use crate::error::Result;
use crate::types::{HandlerOutcome, MessageHandler};

const EMPTY_QUESTION_REPLY: &str = "请在触发词后输入您的问题。";

/// Answers triggered messages, and every message from a sender in a session,
/// with the configured completion model.
pub struct AiChat {
    completer: Arc<dyn ChatCompleter>,
}

impl AiChat {
    pub fn new(completer: Arc<dyn ChatCompleter>) -> Self {
        Self { completer }
    }
}

#[async_trait]
impl MessageHandler for AiChat {
    fn name(&self) -> &str {
        "AiChat"
    }

    fn labels(&self) -> &[&'static str] {
        &["ai", "chat"]
    }

    /// Only typed text and quote replies are questions; pats, images and
    /// system notices never reach the model.
    async fn pre_action(&self, ctx: &MessageContext) -> bool {
        let askable = match ctx.message.msg_type {
            MessageType::Text => true,
            MessageType::App => ctx.message.app_msg_type == Some(AppMsgType::Quote),
            _ => false,
        };
        askable && ctx.settings.is_ai_chat_enabled()
    }

    async fn run(&self, ctx: &MessageContext) -> Result<HandlerOutcome> {
        let in_session = ctx.session.is_active();
        if !in_session && !ctx.settings.is_ai_trigger(&ctx.message).await {
            return Ok(HandlerOutcome::NotMatched);
        }

        if in_session {
            // a failed renew only shortens the session; still answer
            if let Err(e) = ctx.sessions.renew(&ctx.message).await {
                warn!(error = %e, "session renew failed");
            }
        }

        let question = extract_question(&ctx.match_text(), &ctx.settings.ai_trigger_word());
        if question.is_empty() {
            return Ok(HandlerOutcome::Handled(EMPTY_QUESTION_REPLY.to_string()));
        }

        let config = ctx.settings.ai_config();
        debug!(provider = self.completer.name(), model = %config.model, in_session, "asking model");

        let reply = match self.completer.complete(&config, vec![ChatMessage::user(question)]).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, provider = self.completer.name(), "completion failed");
                e.user_message()
            }
        };
        Ok(HandlerOutcome::Handled(reply))
    }
}

/// Strip a leading `@name` mention and the trigger word from `text`.
///
/// Mentions end at the first U+2005 (the separator chat clients insert after
/// a mention) or space.
pub fn extract_question(text: &str, trigger_word: &str) -> String {
    let mut rest = text.trim();

    if let Some(after_at) = rest.strip_prefix('@') {
        rest = match after_at.find(['\u{2005}', ' ']) {
            Some(idx) => after_at[idx..].trim_start_matches(['\u{2005}', ' ']),
            None => "",
        };
    }

    if !trigger_word.is_empty() {
        if let Some(stripped) = rest.strip_prefix(trigger_word) {
            rest = stripped;
        }
    }

    rest.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trigger_word() {
        assert_eq!(extract_question("AI 今天天气如何", "AI"), "今天天气如何");
        assert_eq!(extract_question("AI你好", "AI"), "你好");
    }

    #[test]
    fn strips_mention() {
        assert_eq!(extract_question("@小助手\u{2005}写首诗", "AI"), "写首诗");
        assert_eq!(extract_question("@bot hello", "AI"), "hello");
        assert_eq!(extract_question("@bot\u{2005}AI 讲个笑话", "AI"), "讲个笑话");
    }

    #[test]
    fn bare_mention_is_empty() {
        assert_eq!(extract_question("@小助手", "AI"), "");
        assert_eq!(extract_question("AI", "AI"), "");
    }

    #[test]
    fn session_text_is_kept() {
        assert_eq!(extract_question("继续说", "AI"), "继续说");
        assert_eq!(extract_question("hello", ""), "hello");
    }
}
