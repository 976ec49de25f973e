use std::sync::Arc;
use std::time::Duration;

use relaybot_core::config::{DEFAULT_SESSION_END_TOKEN, DEFAULT_SESSION_START_TOKEN, DEFAULT_SESSION_TTL_SECS};
use relaybot_core::types::Message;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::store::SessionStore;
use crate::types::{SessionKey, SessionState};

/// AI chat session state machine on top of a [`SessionStore`].
///
/// A session is the existence of one TTL key per (room, sender). Every
/// operation is idempotent; store failures surface unchanged so callers
/// never guess at session state.
pub struct AiSessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
    start_token: String,
    end_token: String,
}

impl AiSessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            start_token: DEFAULT_SESSION_START_TOKEN.to_string(),
            end_token: DEFAULT_SESSION_END_TOKEN.to_string(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_tokens(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_token = start.into();
        self.end_token = end.into();
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// If `message` is exactly the start token, open (or refresh) its session.
    pub async fn is_session_start(&self, message: &Message) -> Result<bool> {
        if message.content != self.start_token {
            return Ok(false);
        }
        self.start(message).await?;
        Ok(true)
    }

    /// If `message` is exactly the end token, close its session.
    pub async fn is_session_end(&self, message: &Message) -> Result<bool> {
        if message.content != self.end_token {
            return Ok(false);
        }
        self.expire(message).await?;
        Ok(true)
    }

    pub async fn is_in_session(&self, message: &Message) -> Result<bool> {
        let key = SessionKey::from_message(message);
        self.store.exists(&key.format()).await
    }

    pub async fn state(&self, message: &Message) -> Result<SessionState> {
        Ok(if self.is_in_session(message).await? {
            SessionState::Active
        } else {
            SessionState::NoSession
        })
    }

    #[instrument(skip(self, message), fields(key = %SessionKey::from_message(message)))]
    pub async fn start(&self, message: &Message) -> Result<()> {
        let key = SessionKey::from_message(message);
        self.store.set(&key.format(), self.ttl).await?;
        info!(ttl_secs = self.ttl.as_secs(), "ai session started");
        Ok(())
    }

    /// Push the session deadline out by one TTL. No-op when no session exists.
    #[instrument(skip(self, message), fields(key = %SessionKey::from_message(message)))]
    pub async fn renew(&self, message: &Message) -> Result<()> {
        let key = SessionKey::from_message(message);
        let renewed = self.store.expire(&key.format(), self.ttl).await?;
        debug!(renewed, "ai session renew");
        Ok(())
    }

    #[instrument(skip(self, message), fields(key = %SessionKey::from_message(message)))]
    pub async fn expire(&self, message: &Message) -> Result<()> {
        let key = SessionKey::from_message(message);
        self.store.delete(&key.format()).await?;
        info!("ai session ended");
        Ok(())
    }

    /// Close every session in `room_id`, e.g. when the bot leaves the room.
    #[instrument(skip(self))]
    pub async fn expire_all_for_room(&self, room_id: &str) -> Result<usize> {
        let removed = self.store.delete_by_prefix(&SessionKey::prefix_for_room(room_id)).await?;
        info!(removed, "room ai sessions expired");
        Ok(removed)
    }

    pub fn start_tips(&self) -> String {
        format!(
            "AI会话已开始，请输入您的问题。{}分钟不说话会话将自动结束，您也可以输入 {} 来结束会话。",
            (self.ttl.as_secs() / 60).max(1),
            self.end_token
        )
    }

    pub fn end_tips(&self) -> String {
        format!("AI会话已结束，您可以输入 {} 来重新开始。", self.start_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use crate::store::MemorySessionStore;
    use async_trait::async_trait;

    fn manager() -> AiSessionManager {
        AiSessionManager::new(Arc::new(MemorySessionStore::new()))
    }

    struct DownStore;

    #[async_trait]
    impl SessionStore for DownStore {
        async fn set(&self, _key: &str, _ttl: Duration) -> Result<()> {
            Err(SessionError::StoreUnavailable("redis down".into()))
        }
        async fn exists(&self, _key: &str) -> Result<bool> {
            Err(SessionError::StoreUnavailable("redis down".into()))
        }
        async fn expire(&self, _key: &str, _ttl: Duration) -> Result<bool> {
            Err(SessionError::StoreUnavailable("redis down".into()))
        }
        async fn delete(&self, _key: &str) -> Result<()> {
            Err(SessionError::StoreUnavailable("redis down".into()))
        }
        async fn delete_by_prefix(&self, _prefix: &str) -> Result<usize> {
            Err(SessionError::StoreUnavailable("redis down".into()))
        }
    }

    #[tokio::test]
    async fn start_token_opens_session() {
        let m = manager();
        let msg = Message::room("r1", "u1", "#进入AI会话");
        assert!(m.is_session_start(&msg).await.unwrap());
        assert_eq!(m.state(&msg).await.unwrap(), SessionState::Active);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_leave_one_live_key() {
        let store = Arc::new(MemorySessionStore::new());
        let m = Arc::new(AiSessionManager::new(store.clone()));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let m = Arc::clone(&m);
            tasks.spawn(async move { m.start(&Message::room("r1", "u1", "#进入AI会话")).await });
        }
        while let Some(done) = tasks.join_next().await {
            done.unwrap().unwrap();
        }

        assert_eq!(store.live_count(), 1);
        assert!(m.is_in_session(&Message::room("r1", "u1", "hi")).await.unwrap());
    }

    #[tokio::test]
    async fn tokens_require_exact_match() {
        let m = manager();
        let msg = Message::room("r1", "u1", "#进入AI会话 ");
        assert!(!m.is_session_start(&msg).await.unwrap());
        assert!(!m.is_session_end(&Message::room("r1", "u1", "请#退出AI会话")).await.unwrap());
        assert!(!m.is_in_session(&msg).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_refreshes_ttl() {
        let m = manager();
        let msg = Message::room("r1", "u1", "#进入AI会话");
        m.is_session_start(&msg).await.unwrap();
        tokio::time::advance(Duration::from_secs(400)).await;
        assert!(m.is_session_start(&msg).await.unwrap());
        tokio::time::advance(Duration::from_secs(400)).await;
        assert!(m.is_in_session(&msg).await.unwrap());
    }

    #[tokio::test]
    async fn double_end_is_harmless() {
        let m = manager();
        m.is_session_start(&Message::room("r1", "u1", "#进入AI会话")).await.unwrap();
        let end = Message::room("r1", "u1", "#退出AI会话");
        assert!(m.is_session_end(&end).await.unwrap());
        assert!(!m.is_in_session(&end).await.unwrap());
        assert!(m.is_session_end(&end).await.unwrap());
        assert!(!m.is_in_session(&end).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn unrenewed_session_lapses() {
        let m = manager();
        let msg = Message::room("r1", "u1", "#进入AI会话");
        m.start(&msg).await.unwrap();

        tokio::time::advance(Duration::from_secs(300)).await;
        m.renew(&msg).await.unwrap();
        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(m.is_in_session(&msg).await.unwrap());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(m.state(&msg).await.unwrap(), SessionState::NoSession);
    }

    #[tokio::test]
    async fn renew_without_session_creates_nothing() {
        let m = manager();
        let msg = Message::room("r1", "u1", "hello");
        m.renew(&msg).await.unwrap();
        assert!(!m.is_in_session(&msg).await.unwrap());
    }

    #[tokio::test]
    async fn sessions_are_per_sender_and_room() {
        let m = manager();
        m.start(&Message::room("r1", "u1", "")).await.unwrap();
        assert!(!m.is_in_session(&Message::room("r1", "u2", "")).await.unwrap());
        assert!(!m.is_in_session(&Message::room("r2", "u1", "")).await.unwrap());
    }

    #[tokio::test]
    async fn expire_all_for_room_only_touches_that_room() {
        let m = manager();
        m.start(&Message::room("r1", "u1", "")).await.unwrap();
        m.start(&Message::room("r1", "u2", "")).await.unwrap();
        m.start(&Message::room("r2", "u1", "")).await.unwrap();

        assert_eq!(m.expire_all_for_room("r1").await.unwrap(), 2);
        assert!(!m.is_in_session(&Message::room("r1", "u1", "")).await.unwrap());
        assert!(m.is_in_session(&Message::room("r2", "u1", "")).await.unwrap());
    }

    #[tokio::test]
    async fn store_failures_surface() {
        let m = AiSessionManager::new(Arc::new(DownStore));
        let msg = Message::room("r1", "u1", "#进入AI会话");
        assert!(matches!(m.is_session_start(&msg).await, Err(SessionError::StoreUnavailable(_))));
        assert!(matches!(m.state(&msg).await, Err(SessionError::StoreUnavailable(_))));
        assert!(m.renew(&msg).await.is_err());
        assert!(m.expire_all_for_room("r1").await.is_err());
        // non-control messages never reach the store
        assert!(!m.is_session_start(&Message::room("r1", "u1", "hi")).await.unwrap());
    }

    #[test]
    fn tips_match_defaults() {
        let m = manager();
        assert_eq!(
            m.start_tips(),
            "AI会话已开始，请输入您的问题。10分钟不说话会话将自动结束，您也可以输入 #退出AI会话 来结束会话。"
        );
        assert_eq!(m.end_tips(), "AI会话已结束，您可以输入 #进入AI会话 来重新开始。");
    }

    #[test]
    fn custom_tokens_show_in_tips() {
        let m = manager().with_tokens("#chat", "#bye").with_ttl(Duration::from_secs(300));
        assert!(m.start_tips().contains("5分钟"));
        assert!(m.start_tips().contains("#bye"));
        assert!(m.end_tips().contains("#chat"));
    }
}
