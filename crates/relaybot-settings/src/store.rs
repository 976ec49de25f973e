use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use relaybot_core::settings::{GlobalSettings, RoomSettings};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, SettingsError};

/// Persistence boundary for global and per-room settings.
///
/// `Ok(None)` means "no row"; `Err` means the store itself failed.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn global_settings(&self) -> Result<Option<GlobalSettings>>;

    async fn room_settings(&self, room_id: &str) -> Result<Option<RoomSettings>>;

    async fn create_room_settings(&self, settings: RoomSettings) -> Result<()>;

    async fn update_room_settings(&self, settings: RoomSettings) -> Result<()>;

    /// Create when the row has never been persisted (`id == 0`), otherwise update.
    async fn save_room_settings(&self, settings: RoomSettings) -> Result<()> {
        if settings.id == 0 {
            self.create_room_settings(settings).await
        } else {
            self.update_room_settings(settings).await
        }
    }
}

/// In-process settings store keyed by room id.
pub struct MemorySettingsStore {
    global: RwLock<Option<GlobalSettings>>,
    rooms: DashMap<String, RoomSettings>,
    next_id: AtomicU64,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self {
            global: RwLock::new(None),
            rooms: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Build a store pre-populated from configuration.
    pub fn seeded(global: Option<GlobalSettings>, rooms: Vec<RoomSettings>) -> Self {
        let mut store = Self::new();
        *store.global.get_mut() = global;
        for mut room in rooms {
            room.id = store.next_id.fetch_add(1, Ordering::Relaxed);
            store.rooms.insert(room.chat_room_id.clone(), room);
        }
        store
    }

    pub async fn set_global(&self, global: Option<GlobalSettings>) {
        *self.global.write().await = global;
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn global_settings(&self) -> Result<Option<GlobalSettings>> {
        Ok(self.global.read().await.clone())
    }

    async fn room_settings(&self, room_id: &str) -> Result<Option<RoomSettings>> {
        Ok(self.rooms.get(room_id).map(|r| r.value().clone()))
    }

    async fn create_room_settings(&self, mut settings: RoomSettings) -> Result<()> {
        // Concurrent first sightings of a room both try to create; the first row stays.
        let room_id = settings.chat_room_id.clone();
        self.rooms.entry(room_id.clone()).or_insert_with(|| {
            settings.id = self.next_id.fetch_add(1, Ordering::Relaxed);
            settings
        });
        debug!(room = %room_id, "room settings created");
        Ok(())
    }

    async fn update_room_settings(&self, settings: RoomSettings) -> Result<()> {
        match self.rooms.get_mut(&settings.chat_room_id) {
            Some(mut row) => {
                *row = settings;
                Ok(())
            }
            None => Err(SettingsError::StoreUnavailable(format!(
                "no settings row for room {}",
                settings.chat_room_id
            ))),
        }
    }
}
