// Request handlers - DTO validation, delegation to core, error mapping.
//
// Handlers stay thin: check the body, call into core, wrap the result.
// Failures surface as a `{"detail": ...}` error body.

use super::AppState;
use crate::core::ai::{
    ChatMessageInput, ClassificationOutput, GenerateOutput, ProductContext, RiskLevel,
    SellerPreferences, TrustAnalysis, UserBehaviorInput,
};
use crate::core::moderation::{should_allow_interaction, SellerModerationSettings};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

const MAX_MESSAGE_CHARS: usize = 500;

/// Error envelope: `{"detail": "<message>"}` plus a status code.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "AI Watch Co-Host API",
        "docs": "/docs"
    }))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// POST /api/classify-message
///
/// Message length is checked here, before any provider call.
pub async fn classify_message(
    State(state): State<AppState>,
    Json(input): Json<ChatMessageInput>,
) -> Result<Json<ClassificationOutput>, ApiError> {
    let length = input.message.chars().count();
    if length == 0 || length > MAX_MESSAGE_CHARS {
        return Err(ApiError::bad_request(
            "message must be between 1 and 500 characters",
        ));
    }

    Ok(Json(state.cohost.classify_message(&input.message).await))
}

/// Body of POST /api/generate-response. Absent preferences use the seller
/// defaults.
#[derive(Debug, Deserialize)]
pub struct GenerateInput {
    pub question: String,
    pub product_context: ProductContext,
    #[serde(default)]
    pub seller_preferences: SellerPreferences,
}

/// POST /api/generate-response
pub async fn generate_response(
    State(state): State<AppState>,
    Json(input): Json<GenerateInput>,
) -> Json<GenerateOutput> {
    Json(
        state
            .cohost
            .generate_response(
                &input.question,
                &input.product_context,
                &input.seller_preferences,
            )
            .await,
    )
}

/// POST /api/analyze-user
///
/// The one path where a gateway failure is allowed to escape: hard errors
/// map to a 500 with the error message in `detail`.
pub async fn analyze_user(
    State(state): State<AppState>,
    Json(input): Json<UserBehaviorInput>,
) -> Result<Json<TrustAnalysis>, ApiError> {
    match state.cohost.analyze_user(&input).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            tracing::error!("User analysis failed: {}", e);
            Err(ApiError::internal(e.to_string()))
        }
    }
}

/// Body of POST /api/check-user-allowed.
#[derive(Debug, Deserialize)]
pub struct CheckUserAllowedInput {
    pub user_analysis: TrustAnalysis,
    pub moderation_settings: SellerModerationSettings,
}

#[derive(Debug, Serialize)]
pub struct CheckUserAllowedOutput {
    pub allowed: bool,
    pub reason: String,
    pub trust_score: f32,
    pub risk_level: RiskLevel,
}

/// POST /api/check-user-allowed
pub async fn check_user_allowed(
    Json(input): Json<CheckUserAllowedInput>,
) -> Json<CheckUserAllowedOutput> {
    let (allowed, reason) =
        should_allow_interaction(&input.user_analysis, &input.moderation_settings);

    Json(CheckUserAllowedOutput {
        allowed,
        reason,
        trust_score: input.user_analysis.trust_score,
        risk_level: input.user_analysis.risk_level,
    })
}
