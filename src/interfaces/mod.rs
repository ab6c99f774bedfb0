//! Outer adapters: CSV import and the plain-text summary export.

pub mod csv;
pub mod text;
