use crate::application::ledger::NamedExpense;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One CSV row: `description, amount, payer, participants`, where
/// `participants` is a `;`-separated list of names.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ExpenseRecord {
    pub description: String,
    pub amount: Decimal,
    pub payer: String,
    pub participants: String,
}

impl ExpenseRecord {
    pub fn participant_names(&self) -> Vec<String> {
        self.participants
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<ExpenseRecord> for NamedExpense {
    fn from(record: ExpenseRecord) -> Self {
        let participants = record.participant_names();
        NamedExpense {
            description: record.description,
            amount: record.amount,
            payer: record.payer,
            participants,
        }
    }
}

/// Reads expenses from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// yielding one `Result` per row so a bad row does not end the import.
pub struct ExpenseReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ExpenseReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and deserializes rows.
    pub fn records(self) -> impl Iterator<Item = Result<ExpenseRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
