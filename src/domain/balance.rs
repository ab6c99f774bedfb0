use super::expense::Expense;
use super::money::Balance;
use super::participant::{Participant, ParticipantId};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantBalance {
    pub participant_id: ParticipantId,
    pub balance: Balance,
}

/// Net position of every participant, in participant order.
///
/// Always derived from scratch; there is no way to adjust an entry in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Balances(Vec<ParticipantBalance>);

impl Balances {
    pub fn from_entries(entries: impl IntoIterator<Item = (ParticipantId, Balance)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(participant_id, balance)| ParticipantBalance {
                    participant_id,
                    balance,
                })
                .collect(),
        )
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<Balance> {
        self.0
            .iter()
            .find(|entry| entry.participant_id == *participant)
            .map(|entry| entry.balance)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantBalance> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances; zero up to division rounding.
    pub fn total(&self) -> Decimal {
        self.0.iter().map(|entry| entry.balance.value()).sum()
    }
}

/// Maps participant ids to their position in the participant list and
/// rejects expenses that point anywhere else.
pub(crate) struct ParticipantIndex<'a>(HashMap<&'a ParticipantId, usize>);

impl<'a> ParticipantIndex<'a> {
    pub(crate) fn new(participants: &'a [Participant]) -> Self {
        Self(
            participants
                .iter()
                .enumerate()
                .map(|(position, participant)| (&participant.id, position))
                .collect(),
        )
    }

    pub(crate) fn resolve(&self, participant: &ParticipantId, expense: &Expense) -> Result<usize> {
        self.0.get(participant).copied().ok_or_else(|| {
            LedgerError::IntegrityError(format!(
                "Expense '{}' references unknown participant '{}'",
                expense.id, participant
            ))
        })
    }
}

pub(crate) fn out_of_range(expense: &Expense) -> LedgerError {
    LedgerError::ValidationError(format!(
        "Expense '{}' pushes ledger totals past the supported monetary range",
        expense.id
    ))
}

/// Computes `paid - owed` for every participant.
///
/// Each expense credits its payer the full amount and debits every split
/// member one equal share. Participants without activity are reported at
/// zero. A dangling participant reference fails the whole computation
/// instead of producing a skewed result, and so does a ledger whose sums no
/// longer fit in a `Decimal`.
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> Result<Balances> {
    let index = ParticipantIndex::new(participants);
    let mut balances = vec![Balance::ZERO; participants.len()];
    // Keeps every partial sum in `Balances::total` within range.
    let mut paid = Decimal::ZERO;

    for expense in expenses {
        let share = Balance::new(expense.share()?);
        for member in &expense.participant_ids {
            let slot = &mut balances[index.resolve(member, expense)?];
            *slot = slot.checked_sub(share).ok_or_else(|| out_of_range(expense))?;
        }
        let slot = &mut balances[index.resolve(&expense.payer_id, expense)?];
        *slot = slot
            .checked_add(Balance::from(expense.amount))
            .ok_or_else(|| out_of_range(expense))?;
        paid = paid
            .checked_add(expense.amount.value())
            .ok_or_else(|| out_of_range(expense))?;
    }

    let balances = Balances::from_entries(
        participants
            .iter()
            .map(|participant| participant.id.clone())
            .zip(balances),
    );
    debug!(
        participants = balances.len(),
        expenses = expenses.len(),
        total = %balances.total(),
        "Recomputed balances"
    );
    Ok(balances)
}
