use std::sync::Arc;
use std::time::Duration;

use relaybot_agent::{ChatCompleter, LlmIntentDetector, OpenAiCompatClient};
use relaybot_channels::ReplySender;
use relaybot_core::config::{AutoTriggerMode, RelaybotConfig};
use relaybot_plugins::builtin::{register_defaults, BuiltinDeps, StaticHeadlines};
use relaybot_plugins::{Dispatcher, Pipeline};
use relaybot_sessions::{AiSessionManager, MemorySessionStore};
use relaybot_settings::{MemorySettingsStore, SettingsResolver};
use tracing::info;

/// Central shared state, passed as `Arc<AppState>` to every dispatch task.
pub struct AppState {
    pub config: RelaybotConfig,
    pub dispatcher: Dispatcher,
    /// Kept concrete so the gateway can purge expired keys.
    pub session_store: Arc<MemorySessionStore>,
}

impl AppState {
    /// Wire stores, completer, pipeline and dispatcher from config.
    pub fn build(config: RelaybotConfig, sender: Arc<dyn ReplySender>) -> anyhow::Result<Self> {
        let completer: Arc<dyn ChatCompleter> = Arc::new(OpenAiCompatClient::new(Duration::from_secs(
            config.ai.request_timeout_secs,
        ))?);

        let settings_store = Arc::new(MemorySettingsStore::seeded(config.global.clone(), config.rooms.clone()));
        let mut resolver = SettingsResolver::new(settings_store, &config.bot.broadcast_pattern)?
            .with_default_trigger_word(config.bot.default_trigger_word.as_str())
            .with_room_defaults(config.bot.create_room_defaults);
        if config.plugins.auto_trigger == AutoTriggerMode::Llm {
            resolver = resolver.with_auto_trigger(Arc::new(LlmIntentDetector::new(Arc::clone(&completer))));
        }

        let session_store = Arc::new(MemorySessionStore::new());
        let sessions = AiSessionManager::new(session_store.clone())
            .with_ttl(Duration::from_secs(config.session.ttl_secs))
            .with_tokens(config.session.start_token.as_str(), config.session.end_token.as_str());

        let mut pipeline = Pipeline::new();
        register_defaults(
            &mut pipeline,
            BuiltinDeps {
                completer,
                news: Arc::new(StaticHeadlines::new(config.plugins.morning_news_headlines.clone())),
            },
            &config.plugins.disabled,
        )?;
        info!(handlers = ?pipeline.handler_names(), "pipeline ready");

        let dispatcher = Dispatcher::new(Arc::new(resolver), Arc::new(sessions), Arc::new(pipeline), sender)
            .with_timeout(Duration::from_secs(config.dispatch.timeout_secs));

        Ok(Self {
            config,
            dispatcher,
            session_store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaybot_channels::RecordingSender;
    use relaybot_core::types::Message;
    use relaybot_plugins::DispatchOutcome;

    #[tokio::test]
    async fn builds_from_defaults() {
        let state = AppState::build(RelaybotConfig::default(), Arc::new(RecordingSender::new())).unwrap();
        assert_eq!(state.dispatcher.pipeline().len(), 11);
    }

    #[tokio::test]
    async fn disabled_handlers_are_left_out() {
        let mut config = RelaybotConfig::default();
        config.plugins.disabled = vec!["MorningNews".into(), "Kfc".into()];
        let state = AppState::build(config, Arc::new(RecordingSender::new())).unwrap();
        let names = state.dispatcher.pipeline().handler_names();
        assert!(!names.contains(&"MorningNews"));
        assert!(!names.contains(&"Kfc"));
        assert_eq!(names.len(), 9);
    }

    #[tokio::test]
    async fn bad_broadcast_pattern_fails_startup() {
        let mut config = RelaybotConfig::default();
        config.bot.broadcast_pattern = "(".into();
        assert!(AppState::build(config, Arc::new(RecordingSender::new())).is_err());
    }

    #[tokio::test]
    async fn configured_headlines_are_served() {
        let mut config = RelaybotConfig::default();
        config.plugins.morning_news_headlines = vec!["头条".into()];
        let sender = Arc::new(RecordingSender::new());
        let state = AppState::build(config, sender.clone()).unwrap();

        let outcome = state.dispatcher.dispatch(Message::room("r1", "u1", "早报")).await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Replied {
                handler: "MorningNews".into()
            }
        );
        assert!(sender.sent().await[0].content.ends_with("1. 头条"));
    }

    #[tokio::test]
    async fn custom_session_tokens_are_used() {
        let mut config = RelaybotConfig::default();
        config.session.start_token = "#chat".into();
        let sender = Arc::new(RecordingSender::new());
        let state = AppState::build(config, sender.clone()).unwrap();

        state.dispatcher.dispatch(Message::room("r1", "u1", "#chat")).await.unwrap();
        assert_eq!(state.session_store.live_count(), 1);
    }
}
