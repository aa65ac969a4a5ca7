pub mod config;
pub mod types;
pub mod traits;
pub mod openrouter;

pub use traits::{
    ChatClient,
    ModelCatalogClient,
    LLMClient,
    ChatRequest, ChatResponse, ChatOptions,
    ModelInfo,
    TokenUsage,
};

pub use config::{ClientFactory, ProviderConfig};
pub use openrouter::OpenRouterClient;
pub use types::Message;
