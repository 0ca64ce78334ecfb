//! Request handlers

pub mod health;
pub mod invoices;
pub mod lorry_receipts;
pub mod numbering;
pub mod parties;
pub mod payments;
pub mod truck_hiring_notes;
