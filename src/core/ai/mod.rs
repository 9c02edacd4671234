pub mod ai_service;
pub mod models;
pub mod prompts;

pub use ai_service::{
    AiConfig, AiError, CoHostService, CompletionConfig, CompletionProvider, ProviderError,
};
pub use models::*;
