use crate::domain::model::{AccountId, LedgerEntry, TransactionRecord};
use crate::utils::error::{Result, RouletteError};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balances and audit trail shared by the ledger adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBook {
    accounts: BTreeMap<AccountId, Decimal>,
    transactions: Vec<TransactionRecord>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_account(&self, account_id: AccountId) -> bool {
        self.accounts.contains_key(&account_id)
    }

    pub fn balance(&self, account_id: AccountId) -> Decimal {
        self.accounts
            .get(&account_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn set_balance(&mut self, account_id: AccountId, new_balance: Decimal) -> bool {
        match self.accounts.get_mut(&account_id) {
            Some(balance) => {
                *balance = new_balance;
                true
            }
            None => false,
        }
    }

    pub fn record(&mut self, account_id: AccountId, amount: Decimal, entry: LedgerEntry) {
        self.transactions.push(TransactionRecord {
            account_id,
            amount,
            kind: entry.kind,
            description: entry.description,
            recorded_at: Utc::now(),
        });
    }

    /// Checks everything up front so a rejected posting leaves the book untouched.
    pub fn apply(
        &mut self,
        account_id: AccountId,
        delta: Decimal,
        entry: Option<LedgerEntry>,
    ) -> Result<Decimal> {
        let current = *self
            .accounts
            .get(&account_id)
            .ok_or(RouletteError::AccountNotFound { account_id })?;

        let new_balance = current
            .checked_add(delta)
            .ok_or_else(|| RouletteError::AmountOverflow {
                operation: format!("posting {} to account {}", delta, account_id),
            })?;
        if new_balance < Decimal::ZERO {
            return Err(RouletteError::InsufficientFunds {
                stake: -delta,
                balance: current,
            });
        }

        self.accounts.insert(account_id, new_balance);
        if let Some(entry) = entry {
            self.record(account_id, delta, entry);
        }
        Ok(new_balance)
    }

    pub fn open_account(&mut self, account_id: AccountId, opening_balance: Decimal) -> Decimal {
        *self.accounts.entry(account_id).or_insert(opening_balance)
    }

    pub fn history(&self, account_id: AccountId) -> Vec<TransactionRecord> {
        self.transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BetCategory, TransactionKind};

    #[test]
    fn test_apply_moves_balance_and_records() {
        let mut book = LedgerBook::new();
        book.open_account(1, Decimal::from(100));

        let balance = book
            .apply(1, Decimal::from(-25), Some(LedgerEntry::bet(BetCategory::Black)))
            .unwrap();

        assert_eq!(balance, Decimal::from(75));
        let history = book.history(1);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, Decimal::from(-25));
        assert_eq!(history[0].kind, TransactionKind::Bet);
        assert_eq!(history[0].description, "Placed Black bet");
    }

    #[test]
    fn test_rejected_apply_changes_nothing() {
        let mut book = LedgerBook::new();
        book.open_account(1, Decimal::from(10));
        let before = book.clone();

        let overdraw = book.apply(1, Decimal::from(-11), Some(LedgerEntry::bet(BetCategory::Red)));
        assert!(matches!(overdraw, Err(RouletteError::InsufficientFunds { .. })));

        let missing = book.apply(2, Decimal::from(5), Some(LedgerEntry::win()));
        assert!(matches!(missing, Err(RouletteError::AccountNotFound { account_id: 2 })));

        assert_eq!(book, before);
    }

    #[test]
    fn test_credit_past_decimal_range_changes_nothing() {
        let mut book = LedgerBook::new();
        book.open_account(1, Decimal::MAX);
        let before = book.clone();

        let result = book.apply(1, Decimal::from(1), Some(LedgerEntry::win()));

        assert!(matches!(result, Err(RouletteError::AmountOverflow { .. })));
        assert_eq!(book, before);
    }

    #[test]
    fn test_zero_credit_without_entry_leaves_no_audit_line() {
        let mut book = LedgerBook::new();
        book.open_account(3, Decimal::from(40));

        assert_eq!(book.apply(3, Decimal::ZERO, None).unwrap(), Decimal::from(40));
        assert!(book.history(3).is_empty());
    }

    #[test]
    fn test_open_account_is_idempotent() {
        let mut book = LedgerBook::new();
        assert_eq!(book.open_account(4, Decimal::from(50)), Decimal::from(50));
        assert_eq!(book.open_account(4, Decimal::from(999)), Decimal::from(50));
    }

    #[test]
    fn test_unknown_account_reads_zero_and_rejects_updates() {
        let mut book = LedgerBook::new();
        assert_eq!(book.balance(9), Decimal::ZERO);
        assert!(!book.set_balance(9, Decimal::from(10)));
        assert!(!book.has_account(9));
    }
}
