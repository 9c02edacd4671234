// Moderation domain models.
//
// The trust analysis itself comes from the AI layer; these types cover the
// seller-side policy knobs.

use serde::{Deserialize, Serialize};

/// Seller-configured thresholds and toggles controlling which trust
/// outcomes are auto-permitted or auto-blocked.
///
/// `allow_new_accounts`, `min_account_age_days` and `alert_on_suspicious`
/// are accepted and stored but not consulted by the decision engine yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerModerationSettings {
    pub require_verification: bool,
    pub auto_block_bots: bool,
    pub auto_block_trolls: bool,
    pub min_trust_score: u32,
    pub allow_new_accounts: bool,
    pub min_account_age_days: u32,
    pub alert_on_suspicious: bool,
}

impl Default for SellerModerationSettings {
    fn default() -> Self {
        Self {
            require_verification: false,
            auto_block_bots: true,
            auto_block_trolls: true,
            min_trust_score: 30,
            allow_new_accounts: true,
            min_account_age_days: 0,
            alert_on_suspicious: true,
        }
    }
}
