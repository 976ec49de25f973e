use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::context::MessageContext;
use crate::types::{HandlerOutcome, MessageHandler, PipelineOutcome};

/// Ordered chain of message handlers.
///
/// Registration happens at startup through `&mut self`; once built the
/// pipeline is shared read-only (pass as `Arc<Pipeline>`).
#[derive(Default)]
pub struct Pipeline {
    /// Kept in registration order. Order decides which handler wins.
    handlers: Vec<Arc<dyn MessageHandler>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. No de-duplication and no priorities.
    pub fn register(&mut self, handler: Arc<dyn MessageHandler>) {
        debug!(name = %handler.name(), position = self.handlers.len(), "handler registered");
        self.handlers.push(handler);
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run handlers in order until one handles the message.
    ///
    /// A handler error is logged and treated as "not matched", so one broken
    /// plugin never stops the rest of the chain.
    pub async fn dispatch(&self, ctx: &MessageContext) -> PipelineOutcome {
        for handler in &self.handlers {
            if !handler.pre_action(ctx).await {
                continue;
            }

            let t = Instant::now();
            let result = handler.run(ctx).await;
            let elapsed_ms = t.elapsed().as_millis() as u64;

            match result {
                Ok(HandlerOutcome::Handled(reply)) => {
                    handler.post_action(ctx).await;
                    debug!(handler = %handler.name(), duration_ms = elapsed_ms, "handler matched");
                    return PipelineOutcome::Handled {
                        handler: handler.name().to_string(),
                        reply,
                    };
                }
                Ok(HandlerOutcome::NotMatched) => {}
                Err(e) => {
                    warn!(handler = %handler.name(), duration_ms = elapsed_ms, error = %e, "handler failed");
                }
            }
        }

        PipelineOutcome::NotMatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PluginError, Result};
    use async_trait::async_trait;
    use relaybot_core::config::DEFAULT_BROADCAST_PATTERN;
    use relaybot_core::types::Message;
    use relaybot_sessions::{AiSessionManager, MemorySessionStore, SessionState};
    use relaybot_settings::ResolvedSettings;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Calls {
        pre: AtomicUsize,
        run: AtomicUsize,
        post: AtomicUsize,
    }

    enum Behaviour {
        Match(&'static str),
        Pass,
        Fail,
        Gated,
    }

    struct Probe {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<Calls>,
    }

    impl Probe {
        fn new(name: &'static str, behaviour: Behaviour) -> (Arc<Self>, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            let probe = Arc::new(Self {
                name,
                behaviour,
                calls: calls.clone(),
            });
            (probe, calls)
        }
    }

    #[async_trait]
    impl MessageHandler for Probe {
        fn name(&self) -> &str {
            self.name
        }

        async fn pre_action(&self, _ctx: &MessageContext) -> bool {
            self.calls.pre.fetch_add(1, Ordering::SeqCst);
            !matches!(self.behaviour, Behaviour::Gated)
        }

        async fn run(&self, _ctx: &MessageContext) -> Result<HandlerOutcome> {
            self.calls.run.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Match(reply) => Ok(HandlerOutcome::Handled(reply.to_string())),
                Behaviour::Pass | Behaviour::Gated => Ok(HandlerOutcome::NotMatched),
                Behaviour::Fail => Err(PluginError::ExecutionFailed("boom".into())),
            }
        }

        async fn post_action(&self, _ctx: &MessageContext) {
            self.calls.post.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ctx() -> MessageContext {
        MessageContext {
            message: Message::room("r1", "u1", "hello"),
            settings: ResolvedSettings::from_layers(
                "r1",
                None,
                None,
                regex::Regex::new(DEFAULT_BROADCAST_PATTERN).unwrap(),
            ),
            session: SessionState::NoSession,
            sessions: Arc::new(AiSessionManager::new(Arc::new(MemorySessionStore::new()))),
        }
    }

    #[tokio::test]
    async fn first_match_wins() {
        let (a, a_calls) = Probe::new("a", Behaviour::Match("from a"));
        let (b, b_calls) = Probe::new("b", Behaviour::Match("from b"));
        let mut pipeline = Pipeline::new();
        pipeline.register(a);
        pipeline.register(b);

        let outcome = pipeline.dispatch(&ctx()).await;
        assert_eq!(
            outcome,
            PipelineOutcome::Handled {
                handler: "a".into(),
                reply: "from a".into()
            }
        );
        assert_eq!(a_calls.post.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.pre.load(Ordering::SeqCst), 0);
        assert_eq!(b_calls.run.load(Ordering::SeqCst), 0);
        assert_eq!(b_calls.post.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn gated_handler_is_skipped_entirely() {
        let (gated, gated_calls) = Probe::new("gated", Behaviour::Gated);
        let (next, _) = Probe::new("next", Behaviour::Match("ok"));
        let mut pipeline = Pipeline::new();
        pipeline.register(gated);
        pipeline.register(next);

        assert!(matches!(pipeline.dispatch(&ctx()).await, PipelineOutcome::Handled { handler, .. } if handler == "next"));
        assert_eq!(gated_calls.pre.load(Ordering::SeqCst), 1);
        assert_eq!(gated_calls.run.load(Ordering::SeqCst), 0);
        assert_eq!(gated_calls.post.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn errors_and_misses_fall_through_without_post_action() {
        let (failing, failing_calls) = Probe::new("failing", Behaviour::Fail);
        let (missing, missing_calls) = Probe::new("missing", Behaviour::Pass);
        let (last, _) = Probe::new("last", Behaviour::Match("fallback"));
        let mut pipeline = Pipeline::new();
        pipeline.register(failing);
        pipeline.register(missing);
        pipeline.register(last);

        let outcome = pipeline.dispatch(&ctx()).await;
        assert!(matches!(outcome, PipelineOutcome::Handled { ref reply, .. } if reply == "fallback"));
        assert_eq!(failing_calls.run.load(Ordering::SeqCst), 1);
        assert_eq!(failing_calls.post.load(Ordering::SeqCst), 0);
        assert_eq!(missing_calls.post.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn nothing_matched() {
        let (a, _) = Probe::new("a", Behaviour::Pass);
        let mut pipeline = Pipeline::new();
        pipeline.register(a);
        assert_eq!(pipeline.dispatch(&ctx()).await, PipelineOutcome::NotMatched);
        assert_eq!(Pipeline::new().dispatch(&ctx()).await, PipelineOutcome::NotMatched);
    }

    #[test]
    fn names_keep_registration_order() {
        let mut pipeline = Pipeline::new();
        for name in ["z", "a", "m"] {
            pipeline.register(Probe::new(name, Behaviour::Pass).0);
        }
        assert_eq!(pipeline.handler_names(), vec!["z", "a", "m"]);
        assert_eq!(pipeline.len(), 3);
    }
}
