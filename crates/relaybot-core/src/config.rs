use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::settings::{GlobalSettings, RoomSettings};

pub const DEFAULT_TRIGGER_WORD: &str = "AI";
pub const DEFAULT_BROADCAST_PATTERN: &str = r"@所有人|(?i)@all(?:[^a-z0-9_]|$)";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 600;
pub const DEFAULT_SESSION_START_TOKEN: &str = "#进入AI会话";
pub const DEFAULT_SESSION_END_TOKEN: &str = "#退出AI会话";
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const DEFAULT_AI_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Top-level config (relaybot.toml + RELAYBOT_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelaybotConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub ai: AiClientConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
    /// Seed row for the in-memory settings store.
    #[serde(default)]
    pub global: Option<GlobalSettings>,
    /// Seed rows for rooms known up front.
    #[serde(default)]
    pub rooms: Vec<RoomSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Regex matched against @-mentions that address everyone rather than the bot.
    #[serde(default = "default_broadcast_pattern")]
    pub broadcast_pattern: String,
    /// Trigger word written into a room's first settings row.
    #[serde(default = "default_trigger_word")]
    pub default_trigger_word: String,
    /// Persist a default settings row the first time a room is seen.
    #[serde(default = "bool_true")]
    pub create_room_defaults: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            broadcast_pattern: default_broadcast_pattern(),
            default_trigger_word: default_trigger_word(),
            create_room_defaults: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_start_token")]
    pub start_token: String,
    #[serde(default = "default_end_token")]
    pub end_token: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            start_token: default_start_token(),
            end_token: default_end_token(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound on one message's processing time.
    #[serde(default = "default_dispatch_timeout")]
    pub timeout_secs: u64,
    /// Max messages processed at once by the gateway.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_DISPATCH_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiClientConfig {
    #[serde(default = "default_ai_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_AI_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Headlines served by the morning news handler.
    #[serde(default)]
    pub morning_news_headlines: Vec<String>,
    #[serde(default)]
    pub auto_trigger: AutoTriggerMode,
    /// Handler names to leave out of the pipeline.
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoTriggerMode {
    /// Only explicit trigger words and mentions start a reply.
    #[default]
    None,
    /// Ask the workflow model whether a message is addressed to the bot.
    Llm,
}

fn bool_true() -> bool {
    true
}

fn default_broadcast_pattern() -> String {
    DEFAULT_BROADCAST_PATTERN.to_string()
}
fn default_trigger_word() -> String {
    DEFAULT_TRIGGER_WORD.to_string()
}
fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
fn default_start_token() -> String {
    DEFAULT_SESSION_START_TOKEN.to_string()
}
fn default_end_token() -> String {
    DEFAULT_SESSION_END_TOKEN.to_string()
}
fn default_dispatch_timeout() -> u64 {
    DEFAULT_DISPATCH_TIMEOUT_SECS
}
fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}
fn default_ai_request_timeout() -> u64 {
    DEFAULT_AI_REQUEST_TIMEOUT_SECS
}

impl RelaybotConfig {
    /// Load config from the TOML file with env var overrides.
    ///
    /// Priority: env vars > TOML file > defaults. Nested keys use a double
    /// underscore, e.g. `RELAYBOT_SESSION__TTL_SECS=300`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: RelaybotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("RELAYBOT_").split("__"))
            .extract()
            .map_err(|e| crate::error::RelaybotError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.relaybot/relaybot.toml", home)
}
