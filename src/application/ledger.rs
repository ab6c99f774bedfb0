use crate::domain::balance::compute_balances;
use crate::domain::expense::{Expense, ExpenseId, NewExpense};
use crate::domain::money::Amount;
use crate::domain::participant::{Color, Participant, ParticipantId, ParticipantUpdate, validate_name};
use crate::domain::ports::LedgerStoreBox;
use crate::domain::split::{ServicePercent, compute_split_totals};
use crate::domain::summary::LedgerSummary;
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

/// An expense addressed by participant names rather than ids, as typed on
/// the command line or read from an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedExpense {
    pub description: String,
    pub amount: Decimal,
    pub payer: String,
    pub participants: Vec<String>,
}

impl NamedExpense {
    fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::ValidationError(
                "Expense description must not be empty".to_string(),
            ));
        }
        Amount::new(self.amount)?;
        if self.participants.is_empty() {
            return Err(LedgerError::ValidationError(
                "Expense must be split among at least one participant".to_string(),
            ));
        }
        validate_name(&self.payer)?;
        for name in &self.participants {
            validate_name(name)?;
        }
        Ok(())
    }
}

/// The single owner of ledger state.
///
/// `LedgerService` holds the store and a fully loaded snapshot of it. Every
/// mutation validates first, then writes the new collection to the store,
/// and only then swaps it into the snapshot, so the in-memory view never
/// runs ahead of the store. Computations always run on the snapshot.
pub struct LedgerService {
    store: LedgerStoreBox,
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
}

impl LedgerService {
    /// Opens the service and loads the current contents of `store`.
    pub async fn open(store: LedgerStoreBox) -> Result<Self> {
        let mut service = Self {
            store,
            participants: Vec::new(),
            expenses: Vec::new(),
        };
        service.load().await?;
        Ok(service)
    }

    /// Replaces the snapshot with whatever the store currently holds.
    pub async fn load(&mut self) -> Result<()> {
        let snapshot = self.store.load().await?;
        self.participants = snapshot.participants;
        self.expenses = snapshot.expenses;
        Ok(())
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn find_participant_by_name(&self, name: &str) -> Option<&Participant> {
        let name = name.trim();
        self.participants.iter().find(|p| p.name == name)
    }

    /// Looks up a participant id by exact name.
    pub fn participant_id(&self, name: &str) -> Result<ParticipantId> {
        self.find_participant_by_name(name)
            .map(|p| p.id.clone())
            .ok_or_else(|| LedgerError::IntegrityError(format!("Unknown participant '{}'", name.trim())))
    }

    /// Adds a participant. Without an explicit color the first free palette
    /// color is assigned.
    pub async fn add_participant(&mut self, name: &str, color: Option<Color>) -> Result<Participant> {
        let color = color.unwrap_or_else(|| self.next_color());
        let participant = Participant::new(name, Some(color))?;
        if self.find_participant_by_name(&participant.name).is_some() {
            return Err(LedgerError::ValidationError(format!(
                "Participant '{}' already exists",
                participant.name
            )));
        }

        let mut participants = self.participants.clone();
        participants.push(participant.clone());
        self.store.save_participants(&participants).await?;
        self.participants = participants;

        info!(id = %participant.id, name = %participant.name, "Added participant");
        Ok(participant)
    }

    /// Returns the id of the participant with this name, adding them first
    /// if nobody has it yet.
    pub async fn ensure_participant(&mut self, name: &str) -> Result<ParticipantId> {
        match self.find_participant_by_name(name) {
            Some(existing) => Ok(existing.id.clone()),
            None => Ok(self.add_participant(name, None).await?.id),
        }
    }

    /// Renames and/or recolors a participant. Its id never changes.
    pub async fn edit_participant(
        &mut self,
        id: &ParticipantId,
        update: ParticipantUpdate,
    ) -> Result<Participant> {
        let position = self.participant_position(id)?;
        let mut edited = self.participants[position].clone();

        if let Some(name) = update.name {
            let name = validate_name(&name)?;
            if self.participants.iter().any(|p| p.id != *id && p.name == name) {
                return Err(LedgerError::ValidationError(format!(
                    "Participant '{}' already exists",
                    name
                )));
            }
            edited.name = name;
        }
        if let Some(color) = update.color {
            edited.color = Some(color);
        }

        let mut participants = self.participants.clone();
        participants[position] = edited.clone();
        self.store.save_participants(&participants).await?;
        self.participants = participants;

        info!(id = %edited.id, name = %edited.name, "Edited participant");
        Ok(edited)
    }

    /// Removes a participant together with every expense that names them,
    /// as payer or as split member.
    ///
    /// Afterwards no expense references `id`. Expenses are written before
    /// participants so an interrupted removal never leaves the store with
    /// expenses pointing at a missing participant. Each collection is swapped
    /// into the snapshot as soon as its own write succeeds: if the participant
    /// write fails, the snapshot keeps the participant but has already lost
    /// the pruned expenses, exactly like the store.
    pub async fn remove_participant(&mut self, id: &ParticipantId) -> Result<Participant> {
        let position = self.participant_position(id)?;

        let mut participants = self.participants.clone();
        let removed = participants.remove(position);
        let (dropped, expenses): (Vec<Expense>, Vec<Expense>) = self
            .expenses
            .iter()
            .cloned()
            .partition(|expense| expense.references(id));

        self.store.save_expenses(&expenses).await?;
        self.expenses = expenses;
        self.store.save_participants(&participants).await?;
        self.participants = participants;

        info!(
            id = %removed.id,
            name = %removed.name,
            cascaded_expenses = dropped.len(),
            "Removed participant"
        );
        Ok(removed)
    }

    pub async fn add_expense(&mut self, draft: NewExpense) -> Result<Expense> {
        let expense = Expense::from_new(ExpenseId::generate(), draft, Utc::now())?;
        self.check_references(&expense)?;

        let mut expenses = self.expenses.clone();
        expenses.push(expense.clone());
        check_in_range(&self.participants, &expenses)?;
        self.store.save_expenses(&expenses).await?;
        self.expenses = expenses;

        info!(id = %expense.id, amount = %expense.amount, "Added expense");
        Ok(expense)
    }

    /// Resolves names to ids and adds the expense.
    ///
    /// With `create_missing`, unknown names become new participants. The
    /// whole row, new participants included, is validated before anything is
    /// written, so a rejected row never leaves stray participants behind.
    /// New participants are saved before the expense and stay if the expense
    /// write itself fails. Without `create_missing`, an unknown name is an
    /// integrity error.
    pub async fn add_named_expense(
        &mut self,
        expense: NamedExpense,
        create_missing: bool,
    ) -> Result<Expense> {
        expense.validate()?;

        let mut participants = self.participants.clone();
        let mut created = Vec::new();
        let mut ids = Vec::with_capacity(expense.participants.len() + 1);
        for name in std::iter::once(&expense.payer).chain(&expense.participants) {
            let name = name.trim();
            let id = match participants.iter().find(|p| p.name == name) {
                Some(existing) => existing.id.clone(),
                None if create_missing => {
                    let color = Color::next_available(participants.iter().filter_map(|p| p.color.as_ref()));
                    let participant = Participant::new(name, Some(color))?;
                    participants.push(participant.clone());
                    let id = participant.id.clone();
                    created.push(participant);
                    id
                }
                None => {
                    return Err(LedgerError::IntegrityError(format!(
                        "Unknown participant '{}'",
                        name
                    )));
                }
            };
            ids.push(id);
        }
        let payer_id = ids.remove(0);

        let added = Expense::from_new(
            ExpenseId::generate(),
            NewExpense {
                amount: expense.amount,
                description: expense.description,
                payer_id,
                participant_ids: ids,
            },
            Utc::now(),
        )?;
        let mut expenses = self.expenses.clone();
        expenses.push(added.clone());
        check_in_range(&participants, &expenses)?;

        if !created.is_empty() {
            self.store.save_participants(&participants).await?;
            self.participants = participants;
            for participant in &created {
                info!(id = %participant.id, name = %participant.name, "Added participant");
            }
        }
        self.store.save_expenses(&expenses).await?;
        self.expenses = expenses;

        info!(id = %added.id, amount = %added.amount, "Added expense");
        Ok(added)
    }

    /// Replaces an expense's contents, keeping its id and timestamp.
    pub async fn edit_expense(&mut self, id: &ExpenseId, draft: NewExpense) -> Result<Expense> {
        let position = self.expense_position(id)?;
        let original = &self.expenses[position];
        let expense = Expense::from_new(original.id.clone(), draft, original.timestamp)?;
        self.check_references(&expense)?;

        let mut expenses = self.expenses.clone();
        expenses[position] = expense.clone();
        check_in_range(&self.participants, &expenses)?;
        self.store.save_expenses(&expenses).await?;
        self.expenses = expenses;

        info!(id = %expense.id, amount = %expense.amount, "Edited expense");
        Ok(expense)
    }

    pub async fn remove_expense(&mut self, id: &ExpenseId) -> Result<Expense> {
        let position = self.expense_position(id)?;

        let mut expenses = self.expenses.clone();
        let removed = expenses.remove(position);
        self.store.save_expenses(&expenses).await?;
        self.expenses = expenses;

        info!(id = %removed.id, "Removed expense");
        Ok(removed)
    }

    /// Balances, split totals and the settlement plan for the current
    /// snapshot.
    pub fn summary(&self, service: Option<ServicePercent>) -> Result<LedgerSummary> {
        LedgerSummary::compute(&self.participants, &self.expenses, service)
    }

    fn next_color(&self) -> Color {
        Color::next_available(self.participants.iter().filter_map(|p| p.color.as_ref()))
    }

    fn participant_position(&self, id: &ParticipantId) -> Result<usize> {
        self.participants
            .iter()
            .position(|p| p.id == *id)
            .ok_or_else(|| LedgerError::IntegrityError(format!("Unknown participant id '{}'", id)))
    }

    fn expense_position(&self, id: &ExpenseId) -> Result<usize> {
        self.expenses
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| LedgerError::IntegrityError(format!("Unknown expense id '{}'", id)))
    }

    fn check_references(&self, expense: &Expense) -> Result<()> {
        let known = |pid: &ParticipantId| self.participants.iter().any(|p| p.id == *pid);
        if let Some(missing) = std::iter::once(&expense.payer_id)
            .chain(&expense.participant_ids)
            .find(|&pid| !known(pid))
        {
            return Err(LedgerError::IntegrityError(format!(
                "Unknown participant id '{}'",
                missing
            )));
        }
        Ok(())
    }
}

/// Every later summary must be computable, at any service percentage.
fn check_in_range(participants: &[Participant], expenses: &[Expense]) -> Result<()> {
    compute_balances(participants, expenses)?;
    compute_split_totals(participants, expenses)?.with_service(ServicePercent::MAX)?;
    Ok(())
}
