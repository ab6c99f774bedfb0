use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed or out-of-range user input. Nothing was mutated.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// A reference to a participant or expense that does not exist.
    #[error("Integrity error: {0}")]
    IntegrityError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// The ledger store could not be read or written.
    #[error("Persistence error: {0}")]
    PersistenceError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::PersistenceError(Box::new(err))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::PersistenceError(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        LedgerError::PersistenceError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
