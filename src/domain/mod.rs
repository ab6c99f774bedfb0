//! Ledger value objects and the pure balance, settlement and split
//! computations. Nothing in here performs I/O.

pub mod balance;
pub mod expense;
pub mod money;
pub mod participant;
pub mod ports;
pub mod settlement;
pub mod split;
pub mod summary;
