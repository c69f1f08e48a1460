use super::LedgerBook;
use crate::domain::model::{AccountId, LedgerEntry, TransactionRecord};
use crate::domain::ports::Ledger;
use crate::utils::error::{Result, RouletteError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Ledger persisted as a single JSON document.
///
/// Each write goes to a sibling temp file which is then renamed over the
/// ledger, so the file on disk is always either the old or the new book.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<LedgerBook> {
        if !self.path.exists() {
            return Ok(LedgerBook::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LedgerBook::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, account_id: AccountId, book: &LedgerBook) -> Result<()> {
        self.write_book(book).map_err(|e| RouletteError::LedgerWrite {
            account_id,
            message: e.to_string(),
        })
    }

    fn write_book(&self, book: &LedgerBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let content = serde_json::to_string_pretty(book)?;
        if let Err(e) = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, &self.path)) {
            if tmp.is_file() {
                if let Err(cleanup) = fs::remove_file(&tmp) {
                    tracing::warn!("Could not remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        tracing::debug!("Persisted ledger to {}", self.path.display());
        Ok(())
    }

    /// Runs `change` against a copy of the book and persists it only on success.
    /// `change` reports whether it touched the book; untouched books are not rewritten.
    async fn modify<T>(
        &self,
        account_id: AccountId,
        change: impl FnOnce(&mut LedgerBook) -> Result<(T, bool)>,
    ) -> Result<T> {
        let _guard = self.lock.lock().await;
        let mut book = self.load()?;
        let (value, changed) = change(&mut book)?;
        if changed {
            self.persist(account_id, &book)?;
        }
        Ok(value)
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn get_balance(&self, account_id: AccountId) -> Result<Decimal> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.balance(account_id))
    }

    async fn update_balance(&self, account_id: AccountId, new_balance: Decimal) -> Result<bool> {
        self.modify(account_id, |book| {
            let updated = book.set_balance(account_id, new_balance);
            Ok((updated, updated))
        })
        .await
    }

    async fn record_transaction(
        &self,
        account_id: AccountId,
        amount: Decimal,
        entry: LedgerEntry,
    ) -> Result<()> {
        self.modify(account_id, |book| {
            book.record(account_id, amount, entry);
            Ok(((), true))
        })
        .await
    }

    async fn apply(
        &self,
        account_id: AccountId,
        delta: Decimal,
        entry: Option<LedgerEntry>,
    ) -> Result<Decimal> {
        self.modify(account_id, |book| {
            book.apply(account_id, delta, entry).map(|balance| (balance, true))
        })
        .await
    }

    async fn open_account(&self, account_id: AccountId, opening_balance: Decimal) -> Result<Decimal> {
        let balance = self
            .modify(account_id, |book| {
                if book.has_account(account_id) {
                    return Ok((book.balance(account_id), false));
                }
                Ok((book.open_account(account_id, opening_balance), true))
            })
            .await?;
        tracing::info!("Account {} open with balance {}", account_id, balance);
        Ok(balance)
    }

    async fn transactions(&self, account_id: AccountId) -> Result<Vec<TransactionRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.history(account_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BetCategory;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty_ledger() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = FileLedger::new(temp_dir.path().join("ledger.json"));

        assert_eq!(ledger.get_balance(1).await.unwrap(), Decimal::ZERO);
        assert!(!ledger.update_balance(1, Decimal::from(5)).await.unwrap());
        assert!(!ledger.path().exists());
    }

    #[tokio::test]
    async fn test_apply_persists_balance_and_audit_together() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ledger.json");
        let ledger = FileLedger::new(&path);
        ledger.open_account(1, Decimal::from(100)).await.unwrap();

        ledger
            .apply(1, Decimal::from(-10), Some(LedgerEntry::bet(BetCategory::Tiers)))
            .await
            .unwrap();

        // A fresh handle sees both the balance and the audit line.
        let reopened = FileLedger::new(&path);
        assert_eq!(reopened.get_balance(1).await.unwrap(), Decimal::from(90));
        let history = reopened.transactions(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].description, "Placed Tiers bet");
    }

    #[tokio::test]
    async fn test_rejected_apply_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        let ledger = FileLedger::new(&path);
        ledger.open_account(1, Decimal::from(10)).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let result = ledger
            .apply(1, Decimal::from(-50), Some(LedgerEntry::bet(BetCategory::Red)))
            .await;

        assert!(matches!(result, Err(RouletteError::InsufficientFunds { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_write_is_a_ledger_error_and_keeps_the_old_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        let ledger = FileLedger::new(&path);
        ledger.open_account(1, Decimal::from(10)).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        // A directory squatting on the temp path makes every write fail.
        let tmp = temp_dir.path().join("ledger.json.tmp");
        std::fs::create_dir(&tmp).unwrap();

        let err = ledger.update_balance(1, Decimal::from(99)).await.unwrap_err();
        assert!(matches!(err, RouletteError::LedgerWrite { account_id: 1, .. }));
        let err = ledger.open_account(2, Decimal::from(5)).await.unwrap_err();
        assert!(matches!(err, RouletteError::LedgerWrite { account_id: 2, .. }));
        let err = ledger
            .apply(1, Decimal::from(-1), Some(LedgerEntry::bet(BetCategory::Odd)))
            .await
            .unwrap_err();
        assert!(err.is_recoverable());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        assert_eq!(ledger.get_balance(1).await.unwrap(), Decimal::from(10));
    }

    #[tokio::test]
    async fn test_successful_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        let ledger = FileLedger::new(&path);

        ledger.open_account(1, Decimal::from(10)).await.unwrap();
        ledger.update_balance(1, Decimal::from(12)).await.unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("ledger.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        std::fs::write(&path, "{not json").unwrap();
        let ledger = FileLedger::new(&path);

        let err = ledger.get_balance(1).await.unwrap_err();
        assert!(matches!(err, RouletteError::SerializationError(_)));
    }
}
