//! Ledger domain errors

use thiserror::Error;

use core_kernel::{Money, MoneyError, PortError};

use crate::payment::DocumentRef;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A charge component carries a negative amount
    #[error("Negative charge component '{name}': {amount}")]
    NegativeCharge { name: String, amount: Money },

    /// The advance alone exceeds the freshly computed total charges
    #[error("Advance {advance} exceeds total charges {total}")]
    AdvanceExceedsTotal { advance: Money, total: Money },

    /// A payment amount must be strictly positive
    #[error("Payment amount must be positive, got {amount}")]
    NonPositivePayment { amount: Money },

    /// The per-document commit retry budget was exhausted under contention
    #[error("Reconciliation of {document} retries exhausted under contention")]
    Contention { document: DocumentRef },

    /// An edit targeted a document that no longer exists
    #[error("Document {document} no longer exists")]
    DocumentMissing { document: DocumentRef },

    /// Money arithmetic failure (currency mismatch between stored fields)
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Storage failure
    #[error("Ledger store error: {0}")]
    Store(#[from] PortError),
}

impl LedgerError {
    /// Returns true if the caller supplied bad input that should surface as
    /// a field-level error (as opposed to an infrastructure failure)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::NegativeCharge { .. }
                | LedgerError::AdvanceExceedsTotal { .. }
                | LedgerError::NonPositivePayment { .. }
        )
    }
}
