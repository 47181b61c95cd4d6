use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::account::{Account, PayoutRecord};
use crate::domain::config::GlobalConfig;
use crate::domain::errors::PayoutError;

/// Maximum amount withdrawable right now, floored at zero:
/// `balance * subsequent_payout_ratio / 100`.
pub fn max_allowed_payout(account: &Account, config: &GlobalConfig) -> Decimal {
    let cap = account.balance * Decimal::from(config.subsequent_payout_ratio) / Decimal::from(100);
    cap.max(Decimal::ZERO)
}

/// Applies a withdrawal to the account in place.
///
/// An over-cap request is rejected, not clamped; on rejection the account is
/// untouched. On success the record is appended, the balance drops to the
/// post-payout level and the profit history is cleared so the qualified-day
/// counter restarts.
pub fn execute_payout(
    account: &mut Account,
    config: &GlobalConfig,
    amount: Decimal,
    date: DateTime<Utc>,
) -> Result<PayoutRecord, PayoutError> {
    if amount <= Decimal::ZERO {
        return Err(PayoutError::InvalidAmount { amount });
    }

    let max_allowed = max_allowed_payout(account, config);
    if amount > max_allowed {
        return Err(PayoutError::ExceedsCap {
            requested: amount,
            max_allowed,
        });
    }

    let post_balance = account.balance - amount;
    let record = PayoutRecord {
        amount,
        post_balance,
        date,
    };

    account.history_payouts.push(record.clone());
    account.balance = post_balance;
    account.daily_profits.clear();

    Ok(record)
}
