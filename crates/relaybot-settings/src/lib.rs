pub mod error;
pub mod resolver;
pub mod store;
pub mod trigger;
pub mod types;

pub use error::SettingsError;
pub use relaybot_core::settings::{GlobalSettings, RoomSettings};
pub use resolver::{ResolvedSettings, SettingsResolver};
pub use store::{MemorySettingsStore, SettingsStore};
pub use trigger::{AutoTrigger, NeverAutoTrigger};
pub use types::{AiConfig, EffectiveSettings, LeaveAlertConfig, PatConfig, WelcomeConfig};
