use std::sync::Arc;

use relaybot_core::types::Message;
use relaybot_core::xml;
use relaybot_sessions::{AiSessionManager, SessionState};
use relaybot_settings::ResolvedSettings;

/// Everything a handler may look at for one inbound message.
///
/// Built once per dispatch; the settings and session state are snapshots
/// taken before the first handler runs.
pub struct MessageContext {
    pub message: Message,
    pub settings: ResolvedSettings,
    pub session: SessionState,
    pub sessions: Arc<AiSessionManager>,
}

impl MessageContext {
    /// Text used for matching: the quoted title for quote messages, else the content.
    pub fn match_text(&self) -> String {
        xml::match_text(&self.message)
    }
}
