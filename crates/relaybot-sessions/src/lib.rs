pub mod error;
pub mod manager;
pub mod store;
pub mod types;

pub use error::SessionError;
pub use manager::AiSessionManager;
pub use store::{MemorySessionStore, SessionStore};
pub use types::{SessionKey, SessionState};
