use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::account::{Account, AccountType, PayoutRecord};
use crate::domain::config::GlobalConfig;
use crate::domain::errors::{AccountError, PayoutError};
use crate::domain::payout;
use crate::domain::status::{self, AccountStatus};

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_TOKEN_LEN: usize = 5;

/// Owns the account collection and applies every mutation as a whole-object
/// replace. The evaluator stays pure; all state transitions happen here.
///
/// Every operation either fully succeeds or leaves the collection untouched.
pub struct AccountService {
    accounts: Vec<Account>,
}

impl AccountService {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Account, AccountError> {
        self.accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AccountError::NotFound { id: id.to_string() })
    }

    /// Evaluates one account against the global rules.
    pub fn status(&self, id: &str, config: &GlobalConfig) -> Result<AccountStatus, AccountError> {
        let account = self
            .get(id)
            .ok_or_else(|| AccountError::NotFound { id: id.to_string() })?;
        Ok(status::evaluate(account, config))
    }

    /// Creates a fresh account with a generated id and a positional name.
    /// Returns a copy of the stored account.
    pub fn create_account(&mut self) -> Account {
        let id = self.generate_id();
        let name = format!("Account {}", self.accounts.len() + 1);
        info!(%id, %name, "Creating account");
        let account = Account::new(id, name);
        self.accounts.push(account.clone());
        account
    }

    fn generate_id(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let token: String = (0..ID_TOKEN_LEN)
                .map(|_| ID_CHARSET[rng.random_range(0..ID_CHARSET.len())] as char)
                .collect();
            let id = format!("ACC-{token}");
            if !self.accounts.iter().any(|a| a.id == id) {
                return id;
            }
        }
    }

    pub fn rename(&mut self, id: &str, name: String) -> Result<(), AccountError> {
        self.get_mut(id)?.name = name;
        Ok(())
    }

    pub fn set_type(&mut self, id: &str, account_type: AccountType) -> Result<(), AccountError> {
        self.get_mut(id)?.account_type = account_type;
        Ok(())
    }

    /// Records a daily P/L entry and moves the balance by the same amount.
    pub fn add_profit(&mut self, id: &str, pnl: Decimal) -> Result<(), AccountError> {
        let account = self.get_mut(id)?;
        account.balance += pnl;
        account.daily_profits.push(pnl);
        Ok(())
    }

    /// Replaces a recorded entry; the balance moves by the delta so the
    /// balance/profit-history coupling is preserved.
    pub fn edit_profit(
        &mut self,
        id: &str,
        index: usize,
        value: Decimal,
    ) -> Result<(), AccountError> {
        let account = self.get_mut(id)?;
        let len = account.daily_profits.len();
        let entry = account
            .daily_profits
            .get_mut(index)
            .ok_or(AccountError::EntryOutOfRange { index, len })?;
        let old = *entry;
        *entry = value;
        account.balance += value - old;
        Ok(())
    }

    /// Removes a recorded entry and subtracts its value from the balance.
    pub fn delete_profit(&mut self, id: &str, index: usize) -> Result<(), AccountError> {
        let account = self.get_mut(id)?;
        let len = account.daily_profits.len();
        if index >= len {
            return Err(AccountError::EntryOutOfRange { index, len });
        }
        let removed = account.daily_profits.remove(index);
        account.balance -= removed;
        Ok(())
    }

    /// Executes a payout, gated on the evaluated eligibility and on the
    /// percentage-of-balance cap. Rejections leave the account untouched.
    pub fn execute_payout(
        &mut self,
        id: &str,
        amount: Decimal,
        config: &GlobalConfig,
        now: DateTime<Utc>,
    ) -> Result<PayoutRecord, AccountError> {
        let account = self.get_mut(id)?;

        let current = status::evaluate(account, config);
        if !current.can_payout {
            return Err(PayoutError::NotEligible {
                reason: current.reason,
            }
            .into());
        }

        let record = payout::execute_payout(account, config, amount, now)?;
        info!(
            %id,
            amount = %record.amount,
            post_balance = %record.post_balance,
            "Executed payout"
        );
        Ok(record)
    }

    /// Appends a payout record by hand, debiting the balance so the
    /// balance invariant holds. Bookkeeping for withdrawals made outside
    /// the normal flow; does not clear the profit history.
    pub fn add_payout_record(
        &mut self,
        id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        if amount <= Decimal::ZERO {
            return Err(PayoutError::InvalidAmount { amount }.into());
        }
        let account = self.get_mut(id)?;
        let post_balance = account.balance - amount;
        account.history_payouts.push(PayoutRecord {
            amount,
            post_balance,
            date: now,
        });
        account.balance = post_balance;
        Ok(())
    }

    /// Removes a payout record and credits its amount back to the balance.
    pub fn delete_payout_record(&mut self, id: &str, index: usize) -> Result<(), AccountError> {
        let account = self.get_mut(id)?;
        let len = account.history_payouts.len();
        if index >= len {
            return Err(AccountError::PayoutRecordOutOfRange { index, len });
        }
        let removed = account.history_payouts.remove(index);
        account.balance += removed.amount;
        Ok(())
    }

    pub fn delete_account(&mut self, id: &str) -> Result<Account, AccountError> {
        let pos = self
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AccountError::NotFound { id: id.to_string() })?;
        Ok(self.accounts.remove(pos))
    }

    /// Removes every account whose evaluated status is blown and returns
    /// them. The grace delay before sweeping is the caller's concern.
    pub fn remove_blown(&mut self, config: &GlobalConfig) -> Vec<Account> {
        let (blown, alive): (Vec<Account>, Vec<Account>) = std::mem::take(&mut self.accounts)
            .into_iter()
            .partition(|a| status::evaluate(a, config).is_blown);
        self.accounts = alive;
        for account in &blown {
            info!(id = %account.id, name = %account.name, "Removed blown account");
        }
        blown
    }

    pub fn total_balance(&self) -> Decimal {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    pub fn total_payouts(&self) -> Decimal {
        self.accounts.iter().map(|a| a.total_paid_out()).sum()
    }
}
