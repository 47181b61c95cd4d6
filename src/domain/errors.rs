use rust_decimal::Decimal;
use thiserror::Error;

/// Errors related to payout execution
#[derive(Debug, Error, PartialEq)]
pub enum PayoutError {
    #[error("Payout ${requested} exceeds max allowed ${max_allowed}")]
    ExceedsCap {
        requested: Decimal,
        max_allowed: Decimal,
    },

    #[error("Invalid payout amount: ${amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Account not eligible for payout: {reason}")]
    NotEligible { reason: String },
}

/// Errors related to account collection mutations
#[derive(Debug, Error, PartialEq)]
pub enum AccountError {
    #[error("Account not found: {id}")]
    NotFound { id: String },

    #[error("Profit entry index {index} out of range ({len} entries)")]
    EntryOutOfRange { index: usize, len: usize },

    #[error("Payout record index {index} out of range ({len} records)")]
    PayoutRecordOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Payout(#[from] PayoutError),
}
