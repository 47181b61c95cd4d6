use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the account is traded. Informational only; evaluation rules do not
/// distinguish between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Manual,
    Algo,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Manual => write!(f, "Manual"),
            AccountType::Algo => write!(f, "Algo"),
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manual" => Ok(AccountType::Manual),
            "algo" => Ok(AccountType::Algo),
            other => Err(format!("Unknown account type: {other}")),
        }
    }
}

/// A single executed withdrawal. Array position is the ordering key; the
/// last record is the most recent payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    pub amount: Decimal,
    pub post_balance: Decimal,
    pub date: DateTime<Utc>,
}

/// A prop-firm evaluation account.
///
/// Invariant maintained by the mutation layer: `balance` always equals the
/// initial balance (zero) plus the sum of `daily_profits` minus the sum of
/// payout amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Opaque unique token, assigned at creation, immutable.
    pub id: String,

    /// Display label. User-editable, no uniqueness constraint.
    pub name: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Current equity.
    pub balance: Decimal,

    /// Recorded P/L entries, insertion order = chronological order.
    pub daily_profits: Vec<Decimal>,

    /// Executed payouts, insertion order = chronological order.
    pub history_payouts: Vec<PayoutRecord>,
}

impl Account {
    /// Fresh account: zero balance, empty histories.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            account_type: AccountType::Algo,
            balance: Decimal::ZERO,
            daily_profits: Vec::new(),
            history_payouts: Vec::new(),
        }
    }

    /// Most recent payout, if any has ever been executed.
    pub fn last_payout(&self) -> Option<&PayoutRecord> {
        self.history_payouts.last()
    }

    /// Sum of all withdrawn amounts.
    pub fn total_paid_out(&self) -> Decimal {
        self.history_payouts.iter().map(|p| p.amount).sum()
    }
}
