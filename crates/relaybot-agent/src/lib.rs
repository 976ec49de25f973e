pub mod intent;
pub mod openai;
pub mod provider;

pub use intent::LlmIntentDetector;
pub use openai::OpenAiCompatClient;
pub use provider::{ChatCompleter, ChatMessage, ProviderError, Role};
