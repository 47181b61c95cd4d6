use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::account::Account;
use crate::domain::config::GlobalConfig;

/// Derived qualification state of an account. Recomputed on every call,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountStatus {
    pub qualified_days: u32,
    pub is_blown: bool,
    pub can_payout: bool,
    pub reason: String,
}

/// Evaluates the current snapshot of an account against the global rules.
///
/// Pure and total: no I/O, no mutation, always returns a status. The blow
/// threshold is two-stage: before any payout the account is protected by
/// `max_drawdown`, after the first payout the bar shifts to
/// `post_payout_liquidation_level`.
pub fn evaluate(account: &Account, config: &GlobalConfig) -> AccountStatus {
    let balance = account.balance;

    let qualified_days = account
        .daily_profits
        .iter()
        .filter(|p| **p >= config.target_profit_threshold)
        .count() as u32;

    let status = |is_blown: bool, can_payout: bool, reason: String| AccountStatus {
        qualified_days,
        is_blown,
        can_payout,
        reason,
    };

    let days_short = || {
        format!(
            "Need {} more qualified days",
            config.required_days.saturating_sub(qualified_days)
        )
    };

    match account.last_payout() {
        None => {
            if balance <= -config.max_drawdown {
                return status(true, false, format!("Drawdown Limit Hit (${balance})"));
            }
            if qualified_days >= config.required_days && balance > Decimal::ZERO {
                return status(false, true, "First Payout Ready".to_string());
            }
            status(false, false, days_short())
        }
        Some(last) => {
            if balance <= config.post_payout_liquidation_level {
                return status(
                    true,
                    false,
                    format!("Liquidated at ${}", config.post_payout_liquidation_level),
                );
            }
            if qualified_days >= config.required_days && balance > last.post_balance {
                return status(false, true, "Subsequent Payout Ready".to_string());
            }
            // Growth message wins whenever the balance has not moved past the
            // last post-payout level, regardless of the day count.
            if balance <= last.post_balance {
                return status(false, false, "Growth required since last payout".to_string());
            }
            status(false, false, days_short())
        }
    }
}
