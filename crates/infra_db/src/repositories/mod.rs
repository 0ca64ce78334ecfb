//! Repositories
//!
//! CRUD access for freight documents, payments, and parties. Documents are
//! stored as a JSONB payload plus indexed columns; the ledger columns are
//! authoritative (the reconciler updates them without rewriting the
//! payload), so reads patch the rehydrated document from the columns.

pub mod documents;
pub mod parties;
pub mod payments;

pub use documents::{InvoiceRepository, LorryReceiptRepository, TruckHiringNoteRepository};
pub use parties::{CustomerRepository, TransporterRepository};
pub use payments::PaymentRepository;
