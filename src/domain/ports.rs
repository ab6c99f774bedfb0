use super::expense::Expense;
use super::participant::Participant;
use crate::error::Result;
use async_trait::async_trait;

/// Store key holding the participant list.
pub const PARTICIPANTS_KEY: &str = "settleup_participants";
/// Store key holding the expense list.
pub const EXPENSES_KEY: &str = "settleup_expenses";

/// A fully materialized copy of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
}

/// Durable home of participants and expenses.
///
/// Each save replaces the whole collection before returning; readers never
/// observe a partial write.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Loads both collections. Missing collections load as empty.
    async fn load(&self) -> Result<LedgerSnapshot>;
    async fn save_participants(&self, participants: &[Participant]) -> Result<()>;
    async fn save_expenses(&self, expenses: &[Expense]) -> Result<()>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
