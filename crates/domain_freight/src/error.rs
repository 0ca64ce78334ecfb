//! Freight domain errors

use chrono::NaiveDate;
use thiserror::Error;

use core_kernel::MoneyError;
use domain_ledger::LedgerError;

use crate::lorry_receipt::LorryReceiptStatus;

/// Errors raised by freight document construction and transitions
#[derive(Debug, Error)]
pub enum FreightError {
    /// Truck number does not match the registration plate format
    /// `XX 00 XX 0000`
    #[error("Invalid truck number '{0}', expected format like 'MH 12 AB 1234'")]
    InvalidTruckNumber(String),

    /// Expected delivery must fall strictly after the loading date
    #[error("Expected delivery {expected_delivery} is not after loading date {loading}")]
    DeliveryNotAfterLoading {
        loading: NaiveDate,
        expected_delivery: NaiveDate,
    },

    /// A required field was left empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An invoice must cover at least one lorry receipt
    #[error("Invoice must cover at least one lorry receipt")]
    NoLorryReceipts,

    /// Lorry receipt lifecycle only moves forward
    #[error("Cannot transition lorry receipt from {from} to {to}")]
    InvalidStatusTransition {
        from: LorryReceiptStatus,
        to: LorryReceiptStatus,
    },

    /// Structured field validation failures (names, emails, lengths)
    #[error("Validation failed: {0}")]
    FieldValidation(#[from] validator::ValidationErrors),

    /// Charge or settlement rule violation
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Money arithmetic failure
    #[error(transparent)]
    Money(#[from] MoneyError),
}
