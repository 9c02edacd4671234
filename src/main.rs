// This is the entry point of the co-host API server.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (external APIs)
// - `http/` = HTTP-specific adapters (routes, validation, error mapping)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Build the router and serve it

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a pile of mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "http/http_layer.rs"]
mod http;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::ai::{AiConfig, CoHostService, CompletionProvider};
use crate::http::AppState;
use crate::infra::ai::AnthropicClient;

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let provider: Box<dyn CompletionProvider> =
        Box::new(AnthropicClient::new(config.anthropic_api_key.clone()));
    let cohost = Arc::new(CoHostService::new(
        provider,
        AiConfig {
            model: config.anthropic_model.clone(),
            max_tokens: config.anthropic_max_tokens,
        },
    ));

    let state = AppState { cohost };
    let app = http::router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
