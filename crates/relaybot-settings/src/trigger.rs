use async_trait::async_trait;

use crate::types::EffectiveSettings;

/// Intent hook consulted before the trigger-word check.
///
/// Returning `true` makes a message trigger the AI handler even without the
/// trigger word. Implementations must fail closed.
#[async_trait]
pub trait AutoTrigger: Send + Sync {
    async fn auto_trigger(&self, text: &str, settings: &EffectiveSettings) -> bool;
}

/// Default hook: never triggers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAutoTrigger;

#[async_trait]
impl AutoTrigger for NeverAutoTrigger {
    async fn auto_trigger(&self, _text: &str, _settings: &EffectiveSettings) -> bool {
        false
    }
}
