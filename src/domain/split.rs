use super::balance::{ParticipantIndex, out_of_range};
use super::expense::Expense;
use super::participant::{Participant, ParticipantId};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A service or tip percentage between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServicePercent(Decimal);

impl ServicePercent {
    pub fn new(percent: Decimal) -> Result<Self> {
        if (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(LedgerError::ValidationError(format!(
                "Service percentage must be between 0 and 100, got {}",
                percent
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub const MAX: Self = Self(Decimal::ONE_HUNDRED);

    /// `1 + percent / 100`
    pub fn factor(&self) -> Decimal {
        Decimal::ONE + self.0 / Decimal::ONE_HUNDRED
    }
}

impl FromStr for ServicePercent {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let percent = Decimal::from_str(s.trim()).map_err(|_| {
            LedgerError::ValidationError(format!("Service percentage '{}' is not a number", s))
        })?;
        Self::new(percent)
    }
}

impl fmt::Display for ServicePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantTotal {
    pub participant_id: ParticipantId,
    pub total: Decimal,
}

/// Gross cost exposure per participant: the sum of their equal shares,
/// regardless of who paid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SplitTotals(Vec<ParticipantTotal>);

impl SplitTotals {
    pub fn get(&self, participant: &ParticipantId) -> Option<Decimal> {
        self.0
            .iter()
            .find(|entry| entry.participant_id == *participant)
            .map(|entry| entry.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantTotal> {
        self.0.iter()
    }

    /// Scales every total by the service factor. The unscaled totals are
    /// left untouched so other percentages can be applied later.
    pub fn with_service(&self, service: ServicePercent) -> Result<Self> {
        let factor = service.factor();
        self.0
            .iter()
            .map(|entry| {
                let total = entry.total.checked_mul(factor).ok_or_else(|| {
                    LedgerError::ValidationError(format!(
                        "Total for participant '{}' with {}% service exceeds the supported monetary range",
                        entry.participant_id, service
                    ))
                })?;
                Ok(ParticipantTotal {
                    participant_id: entry.participant_id.clone(),
                    total,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

pub fn compute_split_totals(participants: &[Participant], expenses: &[Expense]) -> Result<SplitTotals> {
    let index = ParticipantIndex::new(participants);
    let mut totals = vec![Decimal::ZERO; participants.len()];

    for expense in expenses {
        let share = expense.share()?;
        for member in &expense.participant_ids {
            let slot = &mut totals[index.resolve(member, expense)?];
            *slot = slot.checked_add(share).ok_or_else(|| out_of_range(expense))?;
        }
    }

    Ok(SplitTotals(
        participants
            .iter()
            .zip(totals)
            .map(|(participant, total)| ParticipantTotal {
                participant_id: participant.id.clone(),
                total,
            })
            .collect(),
    ))
}
