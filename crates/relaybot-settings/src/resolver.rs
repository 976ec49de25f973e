use std::sync::Arc;

use regex::Regex;
use relaybot_core::config::DEFAULT_TRIGGER_WORD;
use relaybot_core::settings::{present, GlobalSettings, RoomSettings};
use relaybot_core::types::Message;
use relaybot_core::xml::match_text;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SettingsError};
use crate::store::SettingsStore;
use crate::trigger::{AutoTrigger, NeverAutoTrigger};
use crate::types::{AiConfig, EffectiveSettings, LeaveAlertConfig, PatConfig, WelcomeConfig};

/// Builds the per-message settings view from the global and room layers.
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
    auto_trigger: Arc<dyn AutoTrigger>,
    broadcast: Regex,
    default_trigger_word: String,
    create_room_defaults: bool,
}

impl SettingsResolver {
    pub fn new(store: Arc<dyn SettingsStore>, broadcast_pattern: &str) -> Result<Self> {
        Ok(Self {
            store,
            auto_trigger: Arc::new(NeverAutoTrigger),
            broadcast: Regex::new(broadcast_pattern)?,
            default_trigger_word: DEFAULT_TRIGGER_WORD.to_string(),
            create_room_defaults: true,
        })
    }

    pub fn with_auto_trigger(mut self, hook: Arc<dyn AutoTrigger>) -> Self {
        self.auto_trigger = hook;
        self
    }

    pub fn with_default_trigger_word(mut self, word: impl Into<String>) -> Self {
        self.default_trigger_word = word.into();
        self
    }

    /// When disabled, unseen rooms resolve against the global layer only.
    pub fn with_room_defaults(mut self, enabled: bool) -> Self {
        self.create_room_defaults = enabled;
        self
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Load both layers for `room_id`.
    ///
    /// An empty room id (direct message) skips the room layer entirely. A room
    /// seen for the first time gets a default row persisted; if that write
    /// fails the defaults are still used for this message.
    #[instrument(skip(self), fields(room = %room_id))]
    pub async fn resolve(&self, room_id: &str) -> Result<ResolvedSettings> {
        let global = self.store.global_settings().await?;

        let room = if room_id.is_empty() {
            None
        } else {
            match self.store.room_settings(room_id).await? {
                Some(row) => Some(row),
                None if self.create_room_defaults => {
                    let row = RoomSettings::initial(room_id, self.default_trigger_word.as_str());
                    match self.store.create_room_settings(row.clone()).await {
                        Ok(()) => info!("created default room settings"),
                        Err(e) => warn!(error = %e, "failed to persist default room settings, using defaults"),
                    }
                    Some(row)
                }
                None => None,
            }
        };

        debug!(has_global = global.is_some(), has_room = room.is_some(), "settings resolved");

        Ok(ResolvedSettings {
            room_id: room_id.to_string(),
            global,
            room,
            auto_trigger: Arc::clone(&self.auto_trigger),
            broadcast: self.broadcast.clone(),
        })
    }

    /// Greeting config for new members: the room row if one exists, else the global fields.
    #[instrument(skip(self), fields(room = %room_id))]
    pub async fn welcome_config(&self, room_id: &str) -> Result<WelcomeConfig> {
        let global = self
            .store
            .global_settings()
            .await?
            .ok_or_else(|| SettingsError::NotConfigured("global settings row is missing".into()))?;

        let config = match self.store.room_settings(room_id).await? {
            Some(room) => WelcomeConfig {
                enabled: room.welcome_enabled.unwrap_or(false),
                welcome_type: room.welcome_type,
                text: room.welcome_text,
                url: room.welcome_url,
            },
            None => WelcomeConfig {
                enabled: global.welcome_enabled.unwrap_or(false),
                welcome_type: global.welcome_type,
                text: global.welcome_text,
                url: global.welcome_url,
            },
        };
        Ok(config)
    }

    /// Alert config for members leaving. `None` when neither layer has a row.
    #[instrument(skip(self), fields(room = %room_id))]
    pub async fn leave_alert_config(&self, room_id: &str) -> Result<Option<LeaveAlertConfig>> {
        let global = self.store.global_settings().await?;
        if let Some(room) = self.store.room_settings(room_id).await? {
            return Ok(Some(LeaveAlertConfig {
                enabled: room.leave_chat_room_alert_enabled.unwrap_or(false),
                text: room.leave_chat_room_alert_text,
            }));
        }
        Ok(global.map(|g| LeaveAlertConfig {
            enabled: g.leave_chat_room_alert_enabled.unwrap_or(false),
            text: g.leave_chat_room_alert_text,
        }))
    }

    pub async fn save_room_settings(&self, settings: RoomSettings) -> Result<()> {
        self.store.save_room_settings(settings).await
    }
}

/// Both settings layers for one message plus the trigger policy.
///
/// Every query merges field by field: a present room value wins, then the
/// global value, then the zero value.
#[derive(Clone)]
pub struct ResolvedSettings {
    room_id: String,
    global: Option<GlobalSettings>,
    room: Option<RoomSettings>,
    auto_trigger: Arc<dyn AutoTrigger>,
    broadcast: Regex,
}

impl std::fmt::Debug for ResolvedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSettings")
            .field("room_id", &self.room_id)
            .field("global", &self.global)
            .field("room", &self.room)
            .finish_non_exhaustive()
    }
}

impl ResolvedSettings {
    /// Assemble a view from explicit layers, without touching a store.
    pub fn from_layers(
        room_id: impl Into<String>,
        global: Option<GlobalSettings>,
        room: Option<RoomSettings>,
        broadcast: Regex,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            global,
            room,
            auto_trigger: Arc::new(NeverAutoTrigger),
            broadcast,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn global(&self) -> Option<&GlobalSettings> {
        self.global.as_ref()
    }

    pub fn room(&self) -> Option<&RoomSettings> {
        self.room.as_ref()
    }

    fn layered_str(
        &self,
        room: fn(&RoomSettings) -> &Option<String>,
        global: fn(&GlobalSettings) -> &Option<String>,
    ) -> Option<&str> {
        self.room
            .as_ref()
            .and_then(|r| present(room(r)))
            .or_else(|| self.global.as_ref().and_then(|g| present(global(g))))
    }

    fn layered_flag(
        &self,
        room: fn(&RoomSettings) -> Option<bool>,
        global: fn(&GlobalSettings) -> Option<bool>,
    ) -> bool {
        self.room
            .as_ref()
            .and_then(room)
            .or_else(|| self.global.as_ref().and_then(global))
            .unwrap_or(false)
    }

    pub fn is_ai_chat_enabled(&self) -> bool {
        self.layered_flag(|r| r.chat_ai_enabled, |g| g.chat_ai_enabled)
    }

    pub fn is_ai_drawing_enabled(&self) -> bool {
        self.layered_flag(|r| r.image_ai_enabled, |g| g.image_ai_enabled)
    }

    pub fn is_tts_enabled(&self) -> bool {
        self.layered_flag(|r| r.tts_enabled, |g| g.tts_enabled)
    }

    /// Room trigger word, else the global one, else empty.
    pub fn ai_trigger_word(&self) -> String {
        self.layered_str(|r| &r.chat_ai_trigger, |g| &g.chat_ai_trigger)
            .unwrap_or_default()
            .to_string()
    }

    pub fn ai_config(&self) -> AiConfig {
        let own = |v: Option<&str>| v.unwrap_or_default().to_string();
        let base_url = own(self.layered_str(|r| &r.chat_base_url, |g| &g.chat_base_url));
        AiConfig {
            base_url: normalize_base_url(&base_url),
            api_key: own(self.layered_str(|r| &r.chat_api_key, |g| &g.chat_api_key)),
            model: own(self.layered_str(|r| &r.chat_model, |g| &g.chat_model)),
            workflow_model: own(self.layered_str(|r| &r.workflow_model, |g| &g.workflow_model)),
            image_recognition_model: own(self.layered_str(
                |r| &r.image_recognition_model,
                |g| &g.image_recognition_model,
            )),
            prompt: own(self.layered_str(|r| &r.chat_prompt, |g| &g.chat_prompt)),
            max_completion_tokens: self
                .room
                .as_ref()
                .and_then(|r| r.max_completion_tokens)
                .or_else(|| self.global.as_ref().and_then(|g| g.max_completion_tokens))
                .unwrap_or(0),
            image_model: own(self.layered_str(|r| &r.image_model, |g| &g.image_model)),
        }
    }

    /// Pat settings move as a unit: whichever layer sets `pat_enabled` supplies all fields.
    pub fn pat_config(&self) -> PatConfig {
        if let Some(room) = self.room.as_ref() {
            if let Some(enabled) = room.pat_enabled {
                return PatConfig {
                    enabled,
                    pat_type: room.pat_type.clone(),
                    text: room.pat_text.clone(),
                    voice_timbre: room.pat_voice_timbre.clone(),
                };
            }
        }
        if let Some(global) = self.global.as_ref() {
            if let Some(enabled) = global.pat_enabled {
                return PatConfig {
                    enabled,
                    pat_type: global.pat_type.clone(),
                    text: global.pat_text.clone(),
                    voice_timbre: global.pat_voice_timbre.clone(),
                };
            }
        }
        PatConfig::default()
    }

    pub fn effective(&self) -> EffectiveSettings {
        let trigger = self.ai_trigger_word();
        EffectiveSettings {
            ai_chat_enabled: self.is_ai_chat_enabled(),
            ai_trigger_word: (!trigger.is_empty()).then_some(trigger),
            ai_drawing_enabled: self.is_ai_drawing_enabled(),
            tts_enabled: self.is_tts_enabled(),
            pat: self.pat_config(),
            ai: self.ai_config(),
        }
    }

    /// Whether `message` should be answered by the AI handler.
    ///
    /// 1. Quote messages are matched on their quoted title.
    /// 2. A direct mention fires unless it is an @everyone broadcast.
    /// 3. Otherwise nothing fires while AI chat is disabled.
    /// 4. The intent hook may claim the message.
    /// 5. Finally the text must start with the non-empty trigger word.
    pub async fn is_ai_trigger(&self, message: &Message) -> bool {
        let text = match_text(message);

        if message.is_at_me {
            if self.broadcast.is_match(&text) {
                debug!(msg_id = %message.id, "broadcast mention ignored");
                return false;
            }
            return true;
        }

        if !self.is_ai_chat_enabled() {
            return false;
        }

        let effective = self.effective();
        if self.auto_trigger.auto_trigger(&text, &effective).await {
            debug!(msg_id = %message.id, "auto trigger matched");
            return true;
        }

        match effective.ai_trigger_word.as_deref() {
            Some(word) => text.starts_with(word),
            None => false,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
