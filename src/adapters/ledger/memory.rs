use super::LedgerBook;
use crate::domain::model::{AccountId, LedgerEntry, TransactionRecord};
use crate::domain::ports::Ledger;
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

/// Process-local ledger. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    book: Mutex<LedgerBook>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(account_id: AccountId, balance: Decimal) -> Self {
        let mut book = LedgerBook::new();
        book.open_account(account_id, balance);
        Self::from_book(book)
    }

    pub fn from_book(book: LedgerBook) -> Self {
        Self {
            book: Mutex::new(book),
        }
    }

    pub async fn snapshot(&self) -> LedgerBook {
        self.book.lock().await.clone()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_balance(&self, account_id: AccountId) -> Result<Decimal> {
        Ok(self.book.lock().await.balance(account_id))
    }

    async fn update_balance(&self, account_id: AccountId, new_balance: Decimal) -> Result<bool> {
        Ok(self.book.lock().await.set_balance(account_id, new_balance))
    }

    async fn record_transaction(
        &self,
        account_id: AccountId,
        amount: Decimal,
        entry: LedgerEntry,
    ) -> Result<()> {
        self.book.lock().await.record(account_id, amount, entry);
        Ok(())
    }

    async fn apply(
        &self,
        account_id: AccountId,
        delta: Decimal,
        entry: Option<LedgerEntry>,
    ) -> Result<Decimal> {
        self.book.lock().await.apply(account_id, delta, entry)
    }

    async fn open_account(&self, account_id: AccountId, opening_balance: Decimal) -> Result<Decimal> {
        Ok(self.book.lock().await.open_account(account_id, opening_balance))
    }

    async fn transactions(&self, account_id: AccountId) -> Result<Vec<TransactionRecord>> {
        Ok(self.book.lock().await.history(account_id))
    }
}
