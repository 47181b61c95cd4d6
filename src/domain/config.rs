use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Global evaluation thresholds, shared by every account.
///
/// Each field carries its own serde default so that a partial record written
/// by an older schema version upgrades field-by-field instead of being
/// rejected wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// A daily entry counts as a qualified day iff its value is >= this.
    #[serde(default = "default_target_profit_threshold")]
    pub target_profit_threshold: Decimal,

    /// Minimum qualified days before a payout is permitted.
    #[serde(default = "default_required_days")]
    pub required_days: u32,

    /// Pre-first-payout blow threshold: blown when balance <= -max_drawdown.
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: Decimal,

    /// Post-first-payout blow threshold: blown when balance <= this level.
    /// Zero means break-even.
    #[serde(default = "default_post_payout_liquidation_level")]
    pub post_payout_liquidation_level: Decimal,

    /// Percentage of the current balance withdrawable per payout, in [0,100].
    #[serde(default = "default_subsequent_payout_ratio")]
    pub subsequent_payout_ratio: u32,
}

fn default_target_profit_threshold() -> Decimal {
    Decimal::from(150)
}

fn default_required_days() -> u32 {
    5
}

fn default_max_drawdown() -> Decimal {
    Decimal::from(2000)
}

fn default_post_payout_liquidation_level() -> Decimal {
    Decimal::ZERO
}

fn default_subsequent_payout_ratio() -> u32 {
    50
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            target_profit_threshold: default_target_profit_threshold(),
            required_days: default_required_days(),
            max_drawdown: default_max_drawdown(),
            post_payout_liquidation_level: default_post_payout_liquidation_level(),
            subsequent_payout_ratio: default_subsequent_payout_ratio(),
        }
    }
}

impl GlobalConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_drawdown <= Decimal::ZERO {
            return Err(format!("Invalid max_drawdown: {}", self.max_drawdown));
        }
        if self.subsequent_payout_ratio > 100 {
            return Err(format!(
                "Invalid subsequent_payout_ratio: {}",
                self.subsequent_payout_ratio
            ));
        }
        Ok(())
    }
}
