// HTTP adapter layer - axum routes over the core services.

#[path = "handlers.rs"]
pub mod handlers;

use crate::core::ai::{CoHostService, CompletionProvider};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// State shared across all handlers.
///
/// The co-host service is held behind a trait object so the composition
/// root (and tests) choose the provider.
#[derive(Clone)]
pub struct AppState {
    pub cohost: Arc<CoHostService<Box<dyn CompletionProvider>>>,
}

/// Builds the application router.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/classify-message", post(handlers::classify_message))
        .route("/api/generate-response", post(handlers::generate_response))
        .route("/api/analyze-user", post(handlers::analyze_user))
        .route("/api/check-user-allowed", post(handlers::check_user_allowed))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Browser dashboards call this API cross-origin, so echo the configured
/// origins. Entries that do not form a valid header value are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
