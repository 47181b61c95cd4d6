// Core account domain
pub mod account;

// Evaluation rule configuration
pub mod config;

// Domain-specific error types
pub mod errors;

// Payout execution policy
pub mod payout;

// Status evaluation rules
pub mod status;
