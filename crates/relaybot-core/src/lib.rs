pub mod config;
pub mod error;
pub mod settings;
pub mod types;
pub mod xml;

pub use error::{RelaybotError, Result};
pub use types::{AppMsgType, Message, MessageType};
