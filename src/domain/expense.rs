use super::money::Amount;
use super::participant::ParticipantId;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A shared expense: `payer_id` fronted `amount`, which is split equally
/// among `participant_ids`. The payer need not be part of the split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Amount,
    pub description: String,
    pub payer_id: ParticipantId,
    pub participant_ids: Vec<ParticipantId>,
    /// Informational only.
    pub timestamp: DateTime<Utc>,
}

/// User input for creating or replacing an expense, prior to validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub description: String,
    pub payer_id: ParticipantId,
    pub participant_ids: Vec<ParticipantId>,
}

impl Expense {
    /// Validates a draft into an expense.
    ///
    /// The description is trimmed and must not be blank, the amount must be
    /// positive and the split must name at least one participant. Repeated
    /// split members are collapsed, keeping first-seen order. Whether the ids
    /// exist is the ledger's concern.
    pub fn from_new(
        id: ExpenseId,
        draft: NewExpense,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(LedgerError::ValidationError(
                "Expense description must not be empty".to_string(),
            ));
        }
        let amount = Amount::new(draft.amount)?;

        let mut participant_ids: Vec<ParticipantId> = Vec::with_capacity(draft.participant_ids.len());
        for pid in draft.participant_ids {
            if !participant_ids.contains(&pid) {
                participant_ids.push(pid);
            }
        }
        if participant_ids.is_empty() {
            return Err(LedgerError::ValidationError(
                "Expense must be split among at least one participant".to_string(),
            ));
        }

        Ok(Self {
            id,
            amount,
            description: description.to_string(),
            payer_id: draft.payer_id,
            participant_ids,
            timestamp,
        })
    }

    /// Each split member's equal share of the amount.
    ///
    /// This is the only place the amount is divided by the head count, so an
    /// empty split (e.g. from a hand-edited store) is refused here rather
    /// than dividing by zero.
    pub fn share(&self) -> Result<Decimal, LedgerError> {
        if self.participant_ids.is_empty() {
            return Err(LedgerError::ValidationError(format!(
                "Expense '{}' has no participants to split among",
                self.id
            )));
        }
        Ok(self.amount.value() / Decimal::from(self.participant_ids.len()))
    }

    pub fn references(&self, participant: &ParticipantId) -> bool {
        self.payer_id == *participant || self.participant_ids.contains(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(amount: Decimal, participants: &[&str]) -> NewExpense {
        NewExpense {
            amount,
            description: "Dinner".to_string(),
            payer_id: ParticipantId::new("a"),
            participant_ids: participants.iter().map(|p| ParticipantId::new(*p)).collect(),
        }
    }

    #[test]
    fn test_from_new_rejects_empty_split() {
        let result = Expense::from_new(ExpenseId::generate(), draft(dec!(10), &[]), Utc::now());
        assert!(matches!(result, Err(LedgerError::ValidationError(_))));
    }

    #[test]
    fn test_from_new_rejects_non_positive_amount() {
        let result = Expense::from_new(ExpenseId::generate(), draft(dec!(0), &["a"]), Utc::now());
        assert!(matches!(result, Err(LedgerError::ValidationError(_))));
    }

    #[test]
    fn test_from_new_rejects_blank_description() {
        let mut d = draft(dec!(10), &["a"]);
        d.description = "  ".to_string();
        let result = Expense::from_new(ExpenseId::generate(), d, Utc::now());
        assert!(matches!(result, Err(LedgerError::ValidationError(_))));
    }

    #[test]
    fn test_from_new_collapses_duplicate_members() {
        let expense =
            Expense::from_new(ExpenseId::generate(), draft(dec!(10), &["b", "a", "b"]), Utc::now())
                .unwrap();
        assert_eq!(
            expense.participant_ids,
            vec![ParticipantId::new("b"), ParticipantId::new("a")]
        );
    }

    #[test]
    fn test_share_divides_equally() {
        let expense =
            Expense::from_new(ExpenseId::generate(), draft(dec!(90), &["a", "b", "c"]), Utc::now())
                .unwrap();
        assert_eq!(expense.share().unwrap(), dec!(30));
    }

    #[test]
    fn test_share_refuses_empty_split() {
        let mut expense =
            Expense::from_new(ExpenseId::generate(), draft(dec!(90), &["a"]), Utc::now()).unwrap();
        expense.participant_ids.clear();
        assert!(matches!(expense.share(), Err(LedgerError::ValidationError(_))));
    }

    #[test]
    fn test_references_payer_and_members() {
        let expense =
            Expense::from_new(ExpenseId::generate(), draft(dec!(10), &["b"]), Utc::now()).unwrap();
        assert!(expense.references(&ParticipantId::new("a")));
        assert!(expense.references(&ParticipantId::new("b")));
        assert!(!expense.references(&ParticipantId::new("c")));
    }
}
