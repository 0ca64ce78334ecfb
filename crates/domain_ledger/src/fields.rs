//! Persisted derived ledger fields
//!
//! Derived fields are stored alongside source fields (a deliberate
//! denormalization for list screens and outstanding-balance filters).
//! They are written only by the reconciler; nothing else may set them.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};

use crate::charges::{compute_totals, ChargeBreakdown};
use crate::error::LedgerError;
use crate::status::SettlementStatus;

/// The derived money fields persisted on every chargeable document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFields {
    /// Sum of the document's charge components
    pub total_charges: Money,
    /// Amount paid at creation time, outside the payment ledger
    pub advance_paid: Money,
    /// `advance_paid` plus the sum of linked settlement payments
    pub paid_amount: Money,
    /// `total_charges - paid_amount`
    pub balance_payable: Money,
    /// Derived settlement bucket
    pub status: SettlementStatus,
}

impl LedgerFields {
    /// Fields for a brand-new document with no charges entered yet
    pub fn unpaid(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            total_charges: zero,
            advance_paid: zero,
            paid_amount: zero,
            balance_payable: zero,
            status: SettlementStatus::Unpaid,
        }
    }

    /// Derives the full field set from charge components, the advance, and
    /// the sum of linked settlement payments
    ///
    /// Pass `settled = 0` for a document whose ledger has not been touched.
    ///
    /// # Errors
    ///
    /// Returns `NegativeCharge` for any negative component and
    /// `AdvanceExceedsTotal` when the advance alone is more than the fresh
    /// total. Settlements above the total are not an error; the status
    /// clamps to Paid.
    pub fn derive(
        charges: &ChargeBreakdown,
        advance_paid: Money,
        settled: Money,
    ) -> Result<Self, LedgerError> {
        let totals = compute_totals(charges, advance_paid, settled)?;
        if advance_paid.amount() > totals.total_charges.amount() {
            return Err(LedgerError::AdvanceExceedsTotal {
                advance: advance_paid,
                total: totals.total_charges,
            });
        }
        let paid_amount = advance_paid.checked_add(&settled)?;
        let status = SettlementStatus::derive(paid_amount, totals.total_charges);
        Ok(Self {
            total_charges: totals.total_charges,
            advance_paid,
            paid_amount,
            balance_payable: totals.balance_payable,
            status,
        })
    }
}
