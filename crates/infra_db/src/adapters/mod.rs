//! Port adapters
//!
//! Postgres implementations of the storage contracts defined by the domain
//! crates. Atomicity is carried by single-statement conditional updates,
//! never by advisory locks or serializable transactions.

pub mod ledger;
pub mod numbering;

pub use ledger::PostgresLedgerStore;
pub use numbering::PostgresSequenceStore;
