use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;

/// Key/value store with per-key TTL, shaped after Redis `SET EX`/`EXPIRE`/`DEL`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create or overwrite `key`, expiring after `ttl`.
    async fn set(&self, key: &str, ttl: Duration) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Reset the TTL of a live key. Returns `false` when the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Remove `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove every key starting with `prefix`, returning how many were live.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize>;
}

/// In-process TTL store.
///
/// Entries hold a deadline; expiry is derived at read time and dead entries
/// are dropped lazily. Uses tokio's clock so tests can pause time.
#[derive(Default)]
pub struct MemorySessionStore {
    deadlines: DashMap<String, Instant>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys that have not yet expired.
    pub fn live_count(&self) -> usize {
        let now = Instant::now();
        self.deadlines.iter().filter(|e| *e.value() > now).count()
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.deadlines.len();
        self.deadlines.retain(|_, deadline| *deadline > now);
        let purged = before.saturating_sub(self.deadlines.len());
        if purged > 0 {
            debug!(purged, "expired sessions purged");
        }
        purged
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set(&self, key: &str, ttl: Duration) -> Result<()> {
        self.deadlines.insert(key.to_string(), Instant::now() + ttl);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        // remove_if holds the shard lock, so a concurrent set is never lost
        let expired = self.deadlines.remove_if(key, |_, deadline| *deadline <= now).is_some();
        Ok(!expired && self.deadlines.contains_key(key))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        match self.deadlines.get_mut(key) {
            Some(mut deadline) if *deadline > now => {
                *deadline = now + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.deadlines.remove(key);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize> {
        let now = Instant::now();
        let mut live = 0;
        self.deadlines.retain(|key, deadline| {
            if key.starts_with(prefix) {
                if *deadline > now {
                    live += 1;
                }
                false
            } else {
                true
            }
        });
        Ok(live)
    }
}
