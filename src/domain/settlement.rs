//! Greedy settlement planning.
//!
//! Debtors are matched against creditors largest-first. This does not always
//! reach the theoretical minimum number of transfers, but for groups of a
//! few dozen people it comes very close and runs in `O(n log n)`.

use super::balance::Balances;
use super::money::{Amount, TOLERANCE, round_cents};
use super::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// `from` pays `to` the given amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Amount,
}

struct Position<'a> {
    participant_id: &'a ParticipantId,
    balance: Decimal,
}

/// Produces the transfers that bring every balance back to zero.
///
/// Balances are rounded to cents first; anything that rounds to zero takes
/// no part. Debtors are walked most-negative first and creditors
/// most-positive first, ties broken by participant id so the plan is
/// reproducible. Matches of one cent or less are applied but not emitted,
/// and whatever residue is left once either side runs out is dropped.
pub fn plan_settlement(balances: &Balances) -> Vec<Transfer> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();
    for entry in balances.iter() {
        let position = Position {
            participant_id: &entry.participant_id,
            balance: round_cents(entry.balance.value()),
        };
        if position.balance < Decimal::ZERO {
            debtors.push(position);
        } else if position.balance > Decimal::ZERO {
            creditors.push(position);
        }
    }

    debtors.sort_by(|a, b| {
        a.balance
            .cmp(&b.balance)
            .then_with(|| a.participant_id.cmp(b.participant_id))
    });
    creditors.sort_by(|a, b| {
        b.balance
            .cmp(&a.balance)
            .then_with(|| a.participant_id.cmp(b.participant_id))
    });

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let amount = (-debtor.balance).min(creditor.balance);

        if amount > TOLERANCE {
            transfers.push(Transfer {
                from: debtor.participant_id.clone(),
                to: creditor.participant_id.clone(),
                amount: Amount::settled(round_cents(amount)),
            });
        }
        debtor.balance += amount;
        creditor.balance -= amount;

        if debtor.balance.abs() < TOLERANCE {
            i += 1;
        }
        if creditor.balance < TOLERANCE {
            j += 1;
        }
    }

    let residual: Decimal = debtors[i..]
        .iter()
        .chain(&creditors[j..])
        .map(|position| position.balance.abs())
        .sum();
    debug!(transfers = transfers.len(), %residual, "Planned settlement");

    transfers
}
