use crate::domain::expense::Expense;
use crate::domain::participant::Participant;
use crate::domain::ports::{EXPENSES_KEY, LedgerSnapshot, LedgerStore, PARTICIPANTS_KEY};
use crate::error::Result;
use async_trait::async_trait;
use rocksdb::{DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// A persistent ledger store backed by RocksDB.
///
/// Each collection lives under a single string key as a JSON array, so a
/// save is one atomic `put` that replaces the previous list wholesale.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBLedgerStore {
    db: Arc<DB>,
}

impl RocksDBLedgerStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.db.get_pinned(key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let value = serde_json::to_vec(items)?;
        self.db.put(key, value)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for RocksDBLedgerStore {
    async fn load(&self) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            participants: self.read_list(PARTICIPANTS_KEY)?,
            expenses: self.read_list(EXPENSES_KEY)?,
        })
    }

    async fn save_participants(&self, participants: &[Participant]) -> Result<()> {
        self.write_list(PARTICIPANTS_KEY, participants)
    }

    async fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        self.write_list(EXPENSES_KEY, expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::{ExpenseId, NewExpense};
    use crate::error::LedgerError;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_fresh_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = RocksDBLedgerStore::open(dir.path()).expect("Failed to open RocksDB");
        assert_eq!(store.load().await.unwrap(), LedgerSnapshot::default());
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        let alice = Participant::new("Alice", None).unwrap();
        let expense = Expense::from_new(
            ExpenseId::generate(),
            NewExpense {
                amount: dec!(42.10),
                description: "Groceries".to_string(),
                payer_id: alice.id.clone(),
                participant_ids: vec![alice.id.clone()],
            },
            Utc::now(),
        )
        .unwrap();

        {
            let store = RocksDBLedgerStore::open(dir.path()).unwrap();
            store.save_participants(&[alice.clone()]).await.unwrap();
            store.save_expenses(&[expense.clone()]).await.unwrap();
        }

        let store = RocksDBLedgerStore::open(dir.path()).unwrap();
        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.participants, vec![alice]);
        assert_eq!(snapshot.expenses, vec![expense]);
    }

    #[tokio::test]
    async fn test_rocksdb_corrupt_value_is_persistence_error() {
        let dir = tempdir().unwrap();
        let store = RocksDBLedgerStore::open(dir.path()).unwrap();
        store.db.put(PARTICIPANTS_KEY, b"not json").unwrap();

        assert!(matches!(
            store.load().await,
            Err(LedgerError::PersistenceError(_))
        ));
    }
}
