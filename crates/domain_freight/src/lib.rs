//! Freight Domain - Chargeable Transport Documents
//!
//! The three paperwork artifacts of a transport business, in the order
//! money flows through them:
//!
//! - **Lorry receipt (LR)**: proof of goods handed over for carriage. Carries
//!   its own itemized charges and a delivery lifecycle, and is later covered
//!   by an invoice.
//! - **Invoice**: bills a customer for one or more lorry receipts, with GST
//!   applied per the stored rates. Settled through the payment ledger.
//! - **Truck hiring note (THN)**: engages a third-party truck owner for a
//!   trip, with hire charges and an advance. Also settled through the ledger.
//!
//! Document numbers come from `domain_numbering`; derived money fields and
//! settlement status come from `domain_ledger`. This crate owns the
//! document shapes, their field validation, and their charge component sets.

pub mod error;
pub mod invoice;
pub mod lorry_receipt;
pub mod party;
pub mod truck_hiring_note;
pub mod validation;

pub use error::FreightError;
pub use invoice::{GstType, Invoice};
pub use lorry_receipt::{
    GstPayableBy, InsuranceDetails, LorryReceipt, LorryReceiptCharges, LorryReceiptStatus,
    PackageLine,
};
pub use party::{Customer, Transporter, TransporterSnapshot};
pub use truck_hiring_note::{
    PaymentTerms, ThnCharges, TruckHiringNote, TruckHiringNoteBuilder,
};
pub use validation::validate_truck_number;
