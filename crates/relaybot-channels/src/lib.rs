pub mod error;
pub mod recording;
pub mod sender;
pub mod stdout;
pub mod types;

pub use error::ChannelError;
pub use recording::RecordingSender;
pub use sender::ReplySender;
pub use stdout::StdoutSender;
pub use types::OutboundMessage;
