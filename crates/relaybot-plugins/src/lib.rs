pub mod builtin;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod types;

pub use context::MessageContext;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use engine::Pipeline;
pub use error::{DispatchError, PluginError};
pub use types::{HandlerOutcome, MessageHandler, PipelineOutcome};
