//! Application layer: the ledger service that owns the store and the
//! current snapshot, and feeds the pure domain computations.

pub mod ledger;
