use std::sync::Arc;

use async_trait::async_trait;
use relaybot_settings::{AutoTrigger, EffectiveSettings};
use tracing::{debug, warn};

use crate::provider::{ChatCompleter, ChatMessage};

const INTENT_PROMPT: &str = "你是一个意图识别助手。判断用户的这条群聊消息是否是在向AI助手提问或寻求帮助。只回答 yes 或 no，不要输出其他内容。";

/// Intent hook that asks the workflow model whether a message is aimed at the bot.
///
/// Any provider error, empty config or ambiguous answer counts as "no".
pub struct LlmIntentDetector {
    completer: Arc<dyn ChatCompleter>,
}

impl LlmIntentDetector {
    pub fn new(completer: Arc<dyn ChatCompleter>) -> Self {
        Self { completer }
    }
}

#[async_trait]
impl AutoTrigger for LlmIntentDetector {
    async fn auto_trigger(&self, text: &str, settings: &EffectiveSettings) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let mut config = settings.ai.clone();
        if !config.workflow_model.is_empty() {
            config.model = config.workflow_model.clone();
        }
        config.prompt = INTENT_PROMPT.to_string();
        config.max_completion_tokens = 0;

        match self.completer.complete(&config, vec![ChatMessage::user(text)]).await {
            Ok(answer) => {
                let verdict = is_affirmative(&answer);
                debug!(model = %config.model, verdict, "intent check");
                verdict
            }
            Err(e) => {
                warn!(error = %e, provider = self.completer.name(), "intent check failed");
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.starts_with("yes") || answer.starts_with('是')
}
