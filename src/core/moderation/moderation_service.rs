// Moderation decision engine - pure allow/deny logic.
//
// Combines one trust analysis with the seller's policy and returns the
// verdict plus a human-readable reason. No I/O, no randomness, no state.

use super::moderation_models::SellerModerationSettings;
use crate::core::ai::{RiskLevel, TrustAnalysis, UserClassification};

/// Decides whether a user may interact, given their trust analysis and the
/// seller's moderation settings.
///
/// Rules are evaluated in order and the first match wins; later rules must
/// not run once a rule has matched.
pub fn should_allow_interaction(
    trust: &TrustAnalysis,
    settings: &SellerModerationSettings,
) -> (bool, String) {
    if trust.risk_level == RiskLevel::Critical {
        return (false, format!("User blocked: {}", trust.classification));
    }

    if settings.auto_block_bots && trust.classification == UserClassification::LikelyBot {
        return (false, "Automated bot detected".to_string());
    }

    if settings.auto_block_trolls && trust.classification == UserClassification::Troll {
        return (false, "Disruptive behavior detected".to_string());
    }

    if trust.trust_score < settings.min_trust_score as f32 {
        return (
            false,
            format!(
                "Trust score too low ({}/{})",
                trust.trust_score, settings.min_trust_score
            ),
        );
    }

    if settings.require_verification
        && trust.classification != UserClassification::VerifiedBuyer
    {
        return (false, "Verified buyers only".to_string());
    }

    if trust.risk_level == RiskLevel::High {
        return (true, format!("⚠️ Warning: {}", trust.flags.join(", ")));
    }

    (true, "User cleared".to_string())
}
