// Model gateway - core logic for talking to the completion provider.
//
// Every operation follows the same shape:
//   build prompt -> one provider call -> parse reply as JSON -> map fields
//   onto the typed result -> on failure apply that operation's fallback
//   policy.
//
// NO HTTP or provider specifics here - just the contract and the policy
// table.

use super::models::{
    AiMessage, ClassificationOutput, GenerateOutput, MessageType, ProductContext,
    RecommendedAction, RiskLevel, SellerPreferences, TrustAnalysis, UserBehaviorInput,
    UserClassification,
};
use super::prompts;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Failure raised by a `CompletionProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed API reply: {0}")]
    Envelope(String),
}

/// Failure raised by a gateway operation.
///
/// The variant matters: the user-analysis path recovers from `Parse` with a
/// soft fallback but re-raises `Provider` and `Schema` to the caller.
#[derive(Debug, Error)]
pub enum AiError {
    /// The provider call itself failed (network, non-success status, or an
    /// unreadable reply envelope).
    #[error("Completion provider error: {0}")]
    Provider(String),

    /// The reply text was not the JSON we asked for, or a numeric field was
    /// outside its declared range.
    #[error("Could not parse model output: {0}")]
    Parse(String),

    /// The reply was valid JSON but a required field was missing or had the
    /// wrong type.
    #[error("Model output schema error: {0}")]
    Schema(String),
}

// ============================================================================
// PROVIDER TRAIT (PORT)
// ============================================================================

/// Per-call parameters handed to the completion provider.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one completion request and returns the reply text.
    ///
    /// The reply is untrusted model output; callers must parse it
    /// defensively.
    async fn complete(
        &self,
        messages: &[AiMessage],
        config: &CompletionConfig,
    ) -> Result<String, ProviderError>;
}

// Blanket implementation for Box<dyn CompletionProvider>.
// This lets the HTTP layer hold a trait object and lets tests swap in a
// mock provider without touching the service.
#[async_trait]
impl CompletionProvider for Box<dyn CompletionProvider> {
    async fn complete(
        &self,
        messages: &[AiMessage],
        config: &CompletionConfig,
    ) -> Result<String, ProviderError> {
        (**self).complete(messages, config).await
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Gateway-wide settings: which model to call and the outer token budget.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub model: String,
    pub max_tokens: u32,
}

// Fixed per-operation call parameters. Classification and user analysis
// favor determinism; response generation favors variety.
const CLASSIFY_MAX_TOKENS: u32 = 300;
const CLASSIFY_TEMPERATURE: f32 = 0.3;
const GENERATE_MAX_TOKENS: u32 = 500;
const GENERATE_TEMPERATURE: f32 = 0.5;
const ANALYZE_MAX_TOKENS: u32 = 500;
const ANALYZE_TEMPERATURE: f32 = 0.3;

/// Co-host service: classification, response generation, and user trust
/// analysis, all delegated to one completion provider.
pub struct CoHostService<P: CompletionProvider> {
    provider: P,
    config: AiConfig,
}

impl<P: CompletionProvider> CoHostService<P> {
    pub fn new(provider: P, config: AiConfig) -> Self {
        Self { provider, config }
    }

    /// One provider round trip: send the prompt as a single user message and
    /// parse the reply text as a JSON value.
    ///
    /// Provider failures and unparseable replies come back as distinct
    /// `AiError` variants so each operation can apply its own policy.
    async fn complete_json(
        &self,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Value, AiError> {
        let messages = [AiMessage {
            role: "user".to_string(),
            content: prompt,
        }];
        let config = CompletionConfig {
            model: self.config.model.clone(),
            max_tokens: max_tokens.min(self.config.max_tokens),
            temperature,
        };

        let text = self
            .provider
            .complete(&messages, &config)
            .await
            .map_err(|e| AiError::Provider(e.to_string()))?;

        serde_json::from_str(text.trim()).map_err(|e| AiError::Parse(e.to_string()))
    }

    /// Classify a chat message.
    ///
    /// Never fails: any provider or parsing problem degrades to a neutral
    /// "comment" result carrying the error text in `reasoning`.
    pub async fn classify_message(&self, message: &str) -> ClassificationOutput {
        match self.classify_inner(message).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Classification failed, using fallback: {}", e);
                ClassificationOutput {
                    message_type: MessageType::Comment,
                    confidence: 0.5,
                    topic: None,
                    urgency: Default::default(),
                    reasoning: format!("Error: {}", e),
                }
            }
        }
    }

    async fn classify_inner(&self, message: &str) -> Result<ClassificationOutput, AiError> {
        let value = self
            .complete_json(
                prompts::classification_prompt(message),
                CLASSIFY_MAX_TOKENS,
                CLASSIFY_TEMPERATURE,
            )
            .await?;

        Ok(ClassificationOutput {
            message_type: required(&value, "type")?,
            confidence: bounded_f32(&value, "confidence", 0.0, 1.0)?,
            topic: optional(&value, "topic")?,
            urgency: optional(&value, "urgency")?.unwrap_or_default(),
            reasoning: required(&value, "reasoning")?,
        })
    }

    /// Generate a seller response to a buyer question.
    ///
    /// Never fails: any problem degrades to a stock holding reply flagged
    /// for human review.
    pub async fn generate_response(
        &self,
        question: &str,
        product: &ProductContext,
        preferences: &SellerPreferences,
    ) -> GenerateOutput {
        match self.generate_inner(question, product, preferences).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Response generation failed, using fallback: {}", e);
                GenerateOutput {
                    response_text: "Let me check on that.".to_string(),
                    confidence: 0.0,
                    requires_review: true,
                    reasoning: format!("Error: {}", e),
                    alternative_responses: None,
                }
            }
        }
    }

    async fn generate_inner(
        &self,
        question: &str,
        product: &ProductContext,
        preferences: &SellerPreferences,
    ) -> Result<GenerateOutput, AiError> {
        let value = self
            .complete_json(
                prompts::generation_prompt(question, product, preferences),
                GENERATE_MAX_TOKENS,
                GENERATE_TEMPERATURE,
            )
            .await?;

        Ok(GenerateOutput {
            response_text: required(&value, "response_text")?,
            confidence: bounded_f32(&value, "confidence", 0.0, 1.0)?,
            requires_review: required(&value, "requires_review")?,
            reasoning: required(&value, "reasoning")?,
            alternative_responses: optional(&value, "alternative_responses")?,
        })
    }

    /// Analyze a user's trustworthiness.
    ///
    /// Asymmetric failure policy: malformed-but-received output degrades to
    /// a manual-review verdict, while provider and schema failures stay
    /// fatal and propagate to the caller.
    pub async fn analyze_user(
        &self,
        input: &UserBehaviorInput,
    ) -> Result<TrustAnalysis, AiError> {
        match self.analyze_inner(input).await {
            Ok(analysis) => Ok(analysis),
            Err(AiError::Parse(msg)) => {
                tracing::warn!("User analysis returned unusable output: {}", msg);
                Ok(TrustAnalysis {
                    username: input.username.clone(),
                    trust_score: 50.0,
                    classification: UserClassification::Suspicious,
                    risk_level: RiskLevel::Medium,
                    flags: vec!["Analysis error - manual review".to_string()],
                    reasoning: format!("Error: {}", msg),
                    recommended_action: RecommendedAction::Review,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn analyze_inner(&self, input: &UserBehaviorInput) -> Result<TrustAnalysis, AiError> {
        let value = self
            .complete_json(
                prompts::user_analysis_prompt(input),
                ANALYZE_MAX_TOKENS,
                ANALYZE_TEMPERATURE,
            )
            .await?;

        Ok(TrustAnalysis {
            username: input.username.clone(),
            trust_score: bounded_f32(&value, "trust_score", 0.0, 100.0)?,
            classification: required(&value, "classification")?,
            risk_level: required(&value, "risk_level")?,
            flags: optional(&value, "flags")?.unwrap_or_default(),
            reasoning: required(&value, "reasoning")?,
            recommended_action: required(&value, "recommended_action")?,
        })
    }
}

// ============================================================================
// FIELD MAPPING HELPERS
// ============================================================================

/// Pulls a required field out of the reply object. Absent or mistyped
/// fields are schema errors.
fn required<T: DeserializeOwned>(value: &Value, key: &str) -> Result<T, AiError> {
    let field = value
        .get(key)
        .ok_or_else(|| AiError::Schema(format!("missing required field `{}`", key)))?;
    serde_json::from_value(field.clone())
        .map_err(|_| AiError::Schema(format!("invalid value for field `{}`", key)))
}

/// Pulls an optional field. Absent and JSON null both map to `None`; a
/// present but mistyped value is still a schema error.
fn optional<T: DeserializeOwned>(value: &Value, key: &str) -> Result<Option<T>, AiError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|_| AiError::Schema(format!("invalid value for field `{}`", key))),
    }
}

/// Scores must land inside the closed range the schema promises.
/// Out-of-range model output is rejected as a parse failure, never passed
/// through.
fn bounded_f32(value: &Value, key: &str, lo: f32, hi: f32) -> Result<f32, AiError> {
    let raw: f32 = required(value, key)?;
    if (lo..=hi).contains(&raw) {
        Ok(raw)
    } else {
        Err(AiError::Parse(format!(
            "field `{}` out of range [{}, {}]: {}",
            key, lo, hi, raw
        )))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::models::Urgency;
    use super::*;
    use std::sync::Mutex;

    /// Provider double: either replies with canned text or fails.
    enum MockBehavior {
        Reply(&'static str),
        Fail(&'static str),
    }

    struct MockProvider {
        behavior: MockBehavior,
        last_config: Mutex<Option<CompletionConfig>>,
    }

    impl MockProvider {
        fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                last_config: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(
            &self,
            _messages: &[AiMessage],
            config: &CompletionConfig,
        ) -> Result<String, ProviderError> {
            *self.last_config.lock().unwrap() = Some(config.clone());
            match &self.behavior {
                MockBehavior::Reply(text) => Ok((*text).to_string()),
                MockBehavior::Fail(msg) => Err(ProviderError::Request((*msg).to_string())),
            }
        }
    }

    fn service(behavior: MockBehavior) -> CoHostService<MockProvider> {
        CoHostService::new(
            MockProvider::new(behavior),
            AiConfig {
                model: "test-model".to_string(),
                max_tokens: 1000,
            },
        )
    }

    fn behavior_input(username: &str) -> UserBehaviorInput {
        UserBehaviorInput {
            username: username.to_string(),
            message: "How much?".to_string(),
            message_history: Vec::new(),
            account_age_days: Some(30),
            previous_purchases: None,
            is_verified: false,
            follower_count: None,
            following_count: None,
        }
    }

    #[tokio::test]
    async fn classify_maps_all_fields() {
        let service = service(MockBehavior::Reply(
            r#"{"type": "question", "confidence": 0.92, "topic": "pricing", "urgency": "high", "reasoning": "asks about price"}"#,
        ));

        let output = service.classify_message("How much is the Daytona?").await;

        assert_eq!(output.message_type, MessageType::Question);
        assert_eq!(output.confidence, 0.92);
        assert_eq!(output.topic.as_deref(), Some("pricing"));
        assert_eq!(output.urgency, Urgency::High);
        assert_eq!(output.reasoning, "asks about price");
    }

    #[tokio::test]
    async fn classify_defaults_urgency_when_absent() {
        let service = service(MockBehavior::Reply(
            r#"{"type": "comment", "confidence": 0.7, "reasoning": "small talk"}"#,
        ));

        let output = service.classify_message("nice watch").await;

        assert_eq!(output.urgency, Urgency::Medium);
        assert_eq!(output.topic, None);
    }

    #[tokio::test]
    async fn classify_transport_error_uses_fallback() {
        let service = service(MockBehavior::Fail("connection refused"));

        let output = service.classify_message("hello").await;

        assert_eq!(output.message_type, MessageType::Comment);
        assert_eq!(output.confidence, 0.5);
        assert_eq!(output.urgency, Urgency::Medium);
        assert!(output.reasoning.starts_with("Error:"));
        assert!(output.reasoning.contains("connection refused"));
    }

    #[tokio::test]
    async fn classify_non_json_reply_uses_fallback() {
        let service = service(MockBehavior::Reply("Sure! Here is my analysis..."));

        let output = service.classify_message("hello").await;

        assert_eq!(output.message_type, MessageType::Comment);
        assert_eq!(output.confidence, 0.5);
    }

    #[tokio::test]
    async fn classify_out_of_range_confidence_uses_fallback() {
        let service = service(MockBehavior::Reply(
            r#"{"type": "spam", "confidence": 1.7, "reasoning": "overconfident"}"#,
        ));

        let output = service.classify_message("buy followers now").await;

        // Out-of-range output is a parse failure, not a passthrough.
        assert_eq!(output.message_type, MessageType::Comment);
        assert_eq!(output.confidence, 0.5);
    }

    #[tokio::test]
    async fn classify_uses_fixed_call_parameters() {
        let provider = MockProvider::new(MockBehavior::Reply(
            r#"{"type": "comment", "confidence": 0.6, "reasoning": "ok"}"#,
        ));
        let service = CoHostService::new(
            provider,
            AiConfig {
                model: "test-model".to_string(),
                max_tokens: 1000,
            },
        );

        service.classify_message("hi").await;

        let config = service.provider.last_config.lock().unwrap().clone().unwrap();
        assert_eq!(config.model, "test-model");
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.temperature, 0.3);
    }

    #[tokio::test]
    async fn budget_caps_per_operation_max_tokens() {
        let provider = MockProvider::new(MockBehavior::Reply(
            r#"{"type": "comment", "confidence": 0.6, "reasoning": "ok"}"#,
        ));
        let service = CoHostService::new(
            provider,
            AiConfig {
                model: "test-model".to_string(),
                max_tokens: 100,
            },
        );

        service.classify_message("hi").await;

        let config = service.provider.last_config.lock().unwrap().clone().unwrap();
        assert_eq!(config.max_tokens, 100);
    }

    #[tokio::test]
    async fn generate_maps_all_fields() {
        let service = service(MockBehavior::Reply(
            r#"{"response_text": "Yes, full set included.", "confidence": 0.85, "requires_review": false, "reasoning": "known from listing"}"#,
        ));
        let product = ProductContext {
            brand: "Rolex".to_string(),
            model: "Submariner".to_string(),
            reference: None,
            price: 12000.0,
            year: None,
            condition: "Not specified".to_string(),
            movement: None,
            box_papers: true,
        };

        let output = service
            .generate_response("Box and papers?", &product, &SellerPreferences::default())
            .await;

        assert_eq!(output.response_text, "Yes, full set included.");
        assert!(!output.requires_review);
        assert_eq!(output.alternative_responses, None);
    }

    #[tokio::test]
    async fn generate_failure_uses_stock_reply() {
        let service = service(MockBehavior::Fail("503 service unavailable"));
        let product = ProductContext {
            brand: "Rolex".to_string(),
            model: "Submariner".to_string(),
            reference: None,
            price: 12000.0,
            year: None,
            condition: "Not specified".to_string(),
            movement: None,
            box_papers: false,
        };

        let output = service
            .generate_response("Box and papers?", &product, &SellerPreferences::default())
            .await;

        assert_eq!(output.response_text, "Let me check on that.");
        assert_eq!(output.confidence, 0.0);
        assert!(output.requires_review);
        assert!(output.reasoning.contains("503 service unavailable"));
    }

    #[tokio::test]
    async fn analyze_maps_all_fields() {
        let service = service(MockBehavior::Reply(
            r#"{"trust_score": 85, "classification": "verified_buyer", "risk_level": "low", "flags": [], "reasoning": "established buyer", "recommended_action": "allow"}"#,
        ));

        let analysis = service.analyze_user(&behavior_input("collector42")).await.unwrap();

        assert_eq!(analysis.username, "collector42");
        assert_eq!(analysis.trust_score, 85.0);
        assert_eq!(analysis.classification, UserClassification::VerifiedBuyer);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.recommended_action, RecommendedAction::Allow);
    }

    #[tokio::test]
    async fn analyze_transport_error_propagates() {
        let service = service(MockBehavior::Fail("connection reset"));

        let result = service.analyze_user(&behavior_input("someone")).await;

        // Total invocation failure does not degrade gracefully here.
        match result {
            Err(AiError::Provider(msg)) => assert!(msg.contains("connection reset")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn analyze_non_json_reply_uses_soft_fallback() {
        let service = service(MockBehavior::Reply("I think this user seems fine."));

        let analysis = service.analyze_user(&behavior_input("someone")).await.unwrap();

        assert_eq!(analysis.trust_score, 50.0);
        assert_eq!(analysis.classification, UserClassification::Suspicious);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.flags, vec!["Analysis error - manual review".to_string()]);
        assert_eq!(analysis.recommended_action, RecommendedAction::Review);
    }

    #[tokio::test]
    async fn analyze_out_of_range_score_uses_soft_fallback() {
        let service = service(MockBehavior::Reply(
            r#"{"trust_score": 150, "classification": "verified_buyer", "risk_level": "low", "flags": [], "reasoning": "too generous", "recommended_action": "allow"}"#,
        ));

        let analysis = service.analyze_user(&behavior_input("someone")).await.unwrap();

        assert_eq!(analysis.trust_score, 50.0);
        assert_eq!(analysis.classification, UserClassification::Suspicious);
    }

    #[tokio::test]
    async fn analyze_missing_key_propagates() {
        // No trust_score in the reply: valid JSON, broken schema.
        let service = service(MockBehavior::Reply(
            r#"{"classification": "casual_viewer", "risk_level": "low", "flags": [], "reasoning": "fine", "recommended_action": "allow"}"#,
        ));

        let result = service.analyze_user(&behavior_input("someone")).await;

        match result {
            Err(AiError::Schema(msg)) => assert!(msg.contains("trust_score")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn analyze_unknown_enum_tag_propagates() {
        let service = service(MockBehavior::Reply(
            r#"{"trust_score": 50, "classification": "space_alien", "risk_level": "low", "flags": [], "reasoning": "odd", "recommended_action": "allow"}"#,
        ));

        let result = service.analyze_user(&behavior_input("someone")).await;

        assert!(matches!(result, Err(AiError::Schema(_))));
    }

    #[tokio::test]
    async fn analyze_defaults_flags_when_absent() {
        let service = service(MockBehavior::Reply(
            r#"{"trust_score": 70, "classification": "casual_viewer", "risk_level": "low", "reasoning": "fine", "recommended_action": "allow"}"#,
        ));

        let analysis = service.analyze_user(&behavior_input("someone")).await.unwrap();

        assert!(analysis.flags.is_empty());
    }
}
