pub mod ai_chat;
pub mod ai_session;
pub mod catalog;
pub mod keyword;
pub mod morning_news;
pub mod pat;

use std::sync::Arc;

use relaybot_agent::ChatCompleter;
use tracing::info;

use crate::engine::Pipeline;
use crate::error::Result;
use crate::types::MessageHandler;

pub use ai_chat::AiChat;
pub use ai_session::{AiSessionEnd, AiSessionStart};
pub use keyword::KeywordHandler;
pub use morning_news::{MorningNews, NewsSource, StaticHeadlines};
pub use pat::Pat;

/// Collaborators the built-in handlers need.
pub struct BuiltinDeps {
    pub completer: Arc<dyn ChatCompleter>,
    pub news: Arc<dyn NewsSource>,
}

/// Every built-in handler in its default order.
///
/// Session control comes before chat so the tokens are never sent to the
/// model, and the keyword responders with overlapping vocabularies rely on
/// this order to decide who answers.
pub fn default_handlers(deps: BuiltinDeps) -> Result<Vec<Arc<dyn MessageHandler>>> {
    let handlers: Vec<Arc<dyn MessageHandler>> = vec![
        Arc::new(AiSessionStart),
        Arc::new(AiSessionEnd),
        Arc::new(AiChat::new(deps.completer)),
        Arc::new(Pat),
        Arc::new(MorningNews::new(deps.news)),
        Arc::new(catalog::kfc()?),
        Arc::new(catalog::kfc_story()),
        Arc::new(catalog::love()),
        Arc::new(catalog::love_story()),
        Arc::new(catalog::love_advice()),
        Arc::new(catalog::love_test()),
    ];
    Ok(handlers)
}

/// Register the default handlers, leaving out any whose name is in `disabled`.
pub fn register_defaults(pipeline: &mut Pipeline, deps: BuiltinDeps, disabled: &[String]) -> Result<()> {
    for handler in default_handlers(deps)? {
        if disabled.iter().any(|d| d == handler.name()) {
            info!(name = %handler.name(), "handler disabled by config");
            continue;
        }
        pipeline.register(handler);
    }
    Ok(())
}
