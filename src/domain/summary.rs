use super::balance::{Balances, compute_balances};
use super::expense::Expense;
use super::participant::{Participant, ParticipantId};
use super::settlement::{Transfer, plan_settlement};
use super::split::{ServicePercent, SplitTotals, compute_split_totals};
use crate::error::Result;
use serde::Serialize;

/// Everything derived from one ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub participants: Vec<Participant>,
    pub balances: Balances,
    pub totals: SplitTotals,
    pub service: Option<ServicePercent>,
    pub serviced: Option<SplitTotals>,
    pub transfers: Vec<Transfer>,
}

impl LedgerSummary {
    /// Runs balances, settlement and split totals over a fully loaded
    /// snapshot. Nothing is cached; call again after every change.
    pub fn compute(
        participants: &[Participant],
        expenses: &[Expense],
        service: Option<ServicePercent>,
    ) -> Result<Self> {
        let balances = compute_balances(participants, expenses)?;
        let transfers = plan_settlement(&balances);
        let totals = compute_split_totals(participants, expenses)?;
        let serviced = service
            .map(|service| totals.with_service(service))
            .transpose()?;

        Ok(Self {
            participants: participants.to_vec(),
            balances,
            totals,
            service,
            serviced,
            transfers,
        })
    }

    pub fn name_of<'a>(&'a self, participant: &'a ParticipantId) -> &'a str {
        self.participants
            .iter()
            .find(|p| p.id == *participant)
            .map(|p| p.name.as_str())
            .unwrap_or(participant.as_str())
    }

    pub fn serviced_totals(&self) -> Option<&SplitTotals> {
        self.serviced.as_ref()
    }

    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}
