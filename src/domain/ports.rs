use crate::domain::model::{AccountId, LedgerBackend, LedgerEntry, TransactionRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Account balance and transaction audit store backing a table session.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Current balance, or zero when the account has no record.
    async fn get_balance(&self, account_id: AccountId) -> Result<Decimal>;

    /// Overwrites the stored balance. Returns whether a record was affected.
    async fn update_balance(&self, account_id: AccountId, new_balance: Decimal) -> Result<bool>;

    /// Appends an audit entry. `amount` is signed: negative for bets, positive for wins.
    async fn record_transaction(
        &self,
        account_id: AccountId,
        amount: Decimal,
        entry: LedgerEntry,
    ) -> Result<()>;

    /// Moves the balance by `delta` and appends `entry` as one unit.
    ///
    /// Fails with `AccountNotFound` when there is no record and with
    /// `InsufficientFunds` when the balance would go negative. On failure
    /// neither the balance nor the audit log is changed.
    async fn apply(
        &self,
        account_id: AccountId,
        delta: Decimal,
        entry: Option<LedgerEntry>,
    ) -> Result<Decimal>;

    /// Creates the account with `opening_balance` unless it already exists.
    /// Returns the balance the account holds afterwards.
    async fn open_account(&self, account_id: AccountId, opening_balance: Decimal) -> Result<Decimal>;

    async fn transactions(&self, account_id: AccountId) -> Result<Vec<TransactionRecord>>;
}

pub trait ConfigProvider: Send + Sync {
    fn account_id(&self) -> Option<AccountId>;
    fn ledger_backend(&self) -> LedgerBackend;
    fn ledger_path(&self) -> &str;
    fn opening_balance(&self) -> Option<Decimal>;
    fn wheel_seed(&self) -> Option<u64>;
    fn replay_spins(&self) -> &[u8];
    fn json_logs(&self) -> bool;
}
