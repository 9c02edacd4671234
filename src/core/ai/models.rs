// AI domain models - data structures for the model gateway.
//
// These are pure domain types with no HTTP or provider dependencies.
// Wire forms for the enums are snake_case to match the JSON schema the
// prompts ask the model to produce.

use serde::{Deserialize, Serialize};

/// A single role-tagged message sent to the completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiMessage {
    pub role: String,
    pub content: String,
}

/// Input for message classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageInput {
    pub message: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Category assigned to a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Question,
    Comment,
    Spam,
}

/// How quickly the seller should react to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    #[default]
    Medium,
    Low,
}

/// Output of message classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutput {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub confidence: f32,
    pub topic: Option<String>,
    pub urgency: Urgency,
    pub reasoning: String,
}

/// Product information embedded into the response-generation prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContext {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default = "default_condition")]
    pub condition: String,
    #[serde(default)]
    pub movement: Option<String>,
    #[serde(default)]
    pub box_papers: bool,
}

fn default_condition() -> String {
    "Not specified".to_string()
}

/// Seller communication preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerPreferences {
    pub tone: String,
    pub max_length: u32,
    pub include_username: bool,
}

impl Default for SellerPreferences {
    fn default() -> Self {
        Self {
            tone: "professional".to_string(),
            max_length: 150,
            include_username: true,
        }
    }
}

/// Output of response generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOutput {
    pub response_text: String,
    pub confidence: f32,
    pub requires_review: bool,
    pub reasoning: String,
    pub alternative_responses: Option<Vec<String>>,
}

/// Everything we know about a chat participant when asking the model for a
/// trust judgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBehaviorInput {
    pub username: String,
    pub message: String,
    #[serde(default)]
    pub message_history: Vec<String>,
    #[serde(default)]
    pub account_age_days: Option<u32>,
    #[serde(default)]
    pub previous_purchases: Option<u32>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub follower_count: Option<u32>,
    #[serde(default)]
    pub following_count: Option<u32>,
}

/// The model's verdict on what kind of participant this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserClassification {
    VerifiedBuyer,
    CasualViewer,
    Suspicious,
    LikelyBot,
    Troll,
    Scammer,
}

impl std::fmt::Display for UserClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Moderation reason strings use the wire form.
        match self {
            UserClassification::VerifiedBuyer => write!(f, "verified_buyer"),
            UserClassification::CasualViewer => write!(f, "casual_viewer"),
            UserClassification::Suspicious => write!(f, "suspicious"),
            UserClassification::LikelyBot => write!(f, "likely_bot"),
            UserClassification::Troll => write!(f, "troll"),
            UserClassification::Scammer => write!(f, "scammer"),
        }
    }
}

/// How risky it is to let this user keep interacting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// What the model recommends doing about the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Allow,
    Review,
    Warn,
    Restrict,
    Block,
}

/// Structured trust judgment about a chat participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustAnalysis {
    pub username: String,
    pub trust_score: f32,
    pub classification: UserClassification,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub flags: Vec<String>,
    pub reasoning: String,
    pub recommended_action: RecommendedAction,
}
