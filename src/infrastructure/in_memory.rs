use crate::domain::expense::Expense;
use crate::domain::participant::Participant;
use crate::domain::ports::{LedgerSnapshot, LedgerStore};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger store.
///
/// Clones share the same underlying snapshot. Nothing survives the process,
/// which makes it the default for one-shot imports and for tests.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    snapshot: Arc<RwLock<LedgerSnapshot>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given snapshot.
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self) -> Result<LedgerSnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save_participants(&self, participants: &[Participant]) -> Result<()> {
        self.snapshot.write().await.participants = participants.to_vec();
        Ok(())
    }

    async fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        self.snapshot.write().await.expenses = expenses.to_vec();
        Ok(())
    }
}
