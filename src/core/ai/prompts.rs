// Prompt templates for the model gateway.
//
// Each operation gets one deterministic template that embeds the structured
// input and instructs the model to answer with a single JSON object. Input
// fields are passed through verbatim; there is no sanitization against
// prompt injection.

use super::models::{ProductContext, SellerPreferences, UserBehaviorInput};

/// Prompt asking the model to classify one chat message.
pub fn classification_prompt(message: &str) -> String {
    format!(
        r#"Analyze this live stream chat message.

Message: "{message}"

Respond with ONLY valid JSON:
{{
    "type": "question|comment|spam",
    "confidence": 0.0-1.0,
    "topic": "authenticity|pricing|specs|condition|shipping|general|other",
    "urgency": "high|medium|low",
    "reasoning": "brief explanation"
}}"#
    )
}

/// Prompt asking the model to draft a seller response to a buyer question.
pub fn generation_prompt(
    question: &str,
    product: &ProductContext,
    preferences: &SellerPreferences,
) -> String {
    let product_json =
        serde_json::to_string_pretty(product).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"You are helping a watch dealer respond to questions.

PRODUCT:
{product_json}

QUESTION: "{question}"

Generate a {tone} response (max {max_length} chars).

Respond with ONLY valid JSON:
{{
    "response_text": "the response",
    "confidence": 0.0-1.0,
    "requires_review": true/false,
    "reasoning": "explanation"
}}"#,
        tone = preferences.tone,
        max_length = preferences.max_length,
    )
}

/// Prompt asking the model to judge a chat participant's trustworthiness.
pub fn user_analysis_prompt(input: &UserBehaviorInput) -> String {
    let history = if input.message_history.is_empty() {
        "No history".to_string()
    } else {
        serde_json::to_string(&input.message_history).unwrap_or_else(|_| "[]".to_string())
    };
    let account_age = opt_to_string(input.account_age_days);
    let purchases = opt_to_string(input.previous_purchases);
    let followers = opt_to_string(input.follower_count);

    format!(
        r#"Analyze this live stream chat user and assess their trustworthiness.
USER PROFILE:

Username: {username}
Current Message: "{message}"
Recent Message History: {history}
Account Age: {account_age} days
Previous Purchases: {purchases}
Platform Verified: {is_verified}
Followers: {followers}

ANALYSIS CRITERIA:
BOT INDICATORS:

Repetitive messages, spam phrases
Generic "Check out my..." messages
Excessive emojis/special characters
Rapid identical messages
Random username patterns
No genuine product engagement

TROLL INDICATORS:

Inflammatory language
Time-wasting questions
Attempts to derail conversation
Baiting/provocative statements
Personal attacks

SCAMMER INDICATORS:

Off-platform communication requests
Suspicious payment mentions
Phishing attempts
Too-good-to-be-true offers

GENUINE BUYER INDICATORS:

Specific product questions
Legitimate purchasing interest
Respectful tone
Previous purchase history
Verified account

Respond with ONLY valid JSON:
{{
"trust_score": 0-100,
"classification": "verified_buyer|casual_viewer|suspicious|likely_bot|troll|scammer",
"risk_level": "low|medium|high|critical",
"flags": ["specific concerns"],
"reasoning": "brief explanation",
"recommended_action": "allow|review|warn|restrict|block"
}}

SCORING:

80-100: Verified buyer, established, genuine
60-79: Casual viewer, legitimate
40-59: Suspicious, monitor
20-39: Likely bot/troll, restrict
0-19: Clear bot/scammer, block
"#,
        username = input.username,
        message = input.message,
        is_verified = input.is_verified,
    )
}

fn opt_to_string(value: Option<u32>) -> String {
    value.map_or_else(|| "Unknown".to_string(), |v| v.to_string())
}
