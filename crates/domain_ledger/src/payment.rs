//! Payment records and change events
//!
//! A payment is created, edited, and deleted independently of the documents
//! it settles: documents only *reference* payments. Deleting a payment
//! therefore triggers reconciliation of its former target, never a cascade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{CustomerId, InvoiceId, Money, PaymentId, TruckHiringNoteId};

use crate::error::LedgerError;

/// Direction/semantics of the money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    /// Money received up front against a future document
    Advance,
    /// Money received from a customer
    Receipt,
    /// Money paid out (e.g. to a transporter)
    Payment,
}

impl PaymentKind {
    /// The label as stored and printed
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Advance => "Advance",
            PaymentKind::Receipt => "Receipt",
            PaymentKind::Payment => "Payment",
        }
    }
}

impl std::str::FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Advance" => Ok(PaymentKind::Advance),
            "Receipt" => Ok(PaymentKind::Receipt),
            "Payment" => Ok(PaymentKind::Payment),
            other => Err(format!("unknown payment kind: {other}")),
        }
    }
}

/// How the money moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Cheque,
    #[serde(rename = "NEFT")]
    Neft,
    #[serde(rename = "RTGS")]
    Rtgs,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMode {
    /// The label as stored and printed
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Cheque => "Cheque",
            PaymentMode::Neft => "NEFT",
            PaymentMode::Rtgs => "RTGS",
            PaymentMode::Upi => "UPI",
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMode::Cash),
            "Cheque" => Ok(PaymentMode::Cheque),
            "NEFT" => Ok(PaymentMode::Neft),
            "RTGS" => Ok(PaymentMode::Rtgs),
            "UPI" => Ok(PaymentMode::Upi),
            other => Err(format!("unknown payment mode: {other}")),
        }
    }
}

/// Reference to the chargeable document a payment settles
///
/// Payments settle invoices and truck hiring notes; lorry receipts are
/// settled indirectly through the invoice that covers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentRef {
    Invoice(InvoiceId),
    TruckHiringNote(TruckHiringNoteId),
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::Invoice(id) => write!(f, "{id}"),
            DocumentRef::TruckHiringNote(id) => write!(f, "{id}"),
        }
    }
}

/// A payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Customer the money moved to or from
    pub customer_id: CustomerId,
    /// Date the payment was made
    pub date: NaiveDate,
    /// Payment amount (always positive; `kind` carries direction)
    pub amount: Money,
    /// Direction/semantics
    pub kind: PaymentKind,
    /// Mode of transfer
    pub mode: PaymentMode,
    /// Document this payment settles; None for a general customer receipt
    pub target: Option<DocumentRef>,
    /// External reference (cheque number, UTR)
    pub reference_no: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment
    pub fn new(
        customer_id: CustomerId,
        date: NaiveDate,
        amount: Money,
        kind: PaymentKind,
        mode: PaymentMode,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            customer_id,
            date,
            amount,
            kind,
            mode,
            target: None,
            reference_no: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Links the payment to the document it settles
    pub fn with_target(mut self, target: DocumentRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_no = Some(reference.into());
        self
    }

    /// Validates the payment's value domain
    ///
    /// # Errors
    ///
    /// Returns `NonPositivePayment` unless the amount is strictly positive.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.amount.is_positive() {
            return Err(LedgerError::NonPositivePayment {
                amount: self.amount,
            });
        }
        Ok(())
    }

    /// Whether this payment's amount counts toward its target's paid amount
    ///
    /// Every linked payment settles, regardless of kind; the kind is kept
    /// for reporting only.
    pub fn counts_toward_settlement(&self) -> bool {
        true
    }
}

/// What happened to a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOperation {
    Created,
    Updated,
    Deleted,
}

/// A persisted payment mutation, as seen by the reconciler
///
/// `target` is the payment's target after the operation (None once
/// deleted); `previous_target` is what it pointed at before (None on
/// create).
#[derive(Debug, Clone, Copy)]
pub struct PaymentChange {
    pub operation: PaymentOperation,
    pub target: Option<DocumentRef>,
    pub previous_target: Option<DocumentRef>,
}

impl PaymentChange {
    /// Change event for a newly created payment
    pub fn created(target: Option<DocumentRef>) -> Self {
        Self {
            operation: PaymentOperation::Created,
            target,
            previous_target: None,
        }
    }

    /// Change event for an edited payment (amount and/or target)
    pub fn updated(previous_target: Option<DocumentRef>, target: Option<DocumentRef>) -> Self {
        Self {
            operation: PaymentOperation::Updated,
            target,
            previous_target,
        }
    }

    /// Change event for a deleted payment
    pub fn deleted(previous_target: Option<DocumentRef>) -> Self {
        Self {
            operation: PaymentOperation::Deleted,
            target: None,
            previous_target,
        }
    }

    /// The documents whose ledger fields must be recomputed, deduplicated
    pub fn affected_documents(&self) -> Vec<DocumentRef> {
        let mut affected = Vec::with_capacity(2);
        if let Some(previous) = self.previous_target {
            affected.push(previous);
        }
        if let Some(current) = self.target {
            if Some(current) != self.previous_target {
                affected.push(current);
            }
        }
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn sample_payment(amount: Money) -> Payment {
        Payment::new(
            CustomerId::new(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount,
            PaymentKind::Receipt,
            PaymentMode::Neft,
        )
    }

    #[test]
    fn test_validate_rejects_zero_amount() {
        let payment = sample_payment(Money::zero(Currency::INR));
        assert!(payment.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let payment = sample_payment(Money::new(dec!(-100), Currency::INR));
        assert!(payment.validate().is_err());
    }

    #[test]
    fn test_created_affects_only_new_target() {
        let target = DocumentRef::Invoice(InvoiceId::new());
        let change = PaymentChange::created(Some(target));
        assert_eq!(change.affected_documents(), vec![target]);
    }

    #[test]
    fn test_unlinked_payment_affects_nothing() {
        let change = PaymentChange::created(None);
        assert!(change.affected_documents().is_empty());
    }

    #[test]
    fn test_retarget_affects_both_documents() {
        let a = DocumentRef::Invoice(InvoiceId::new());
        let b = DocumentRef::Invoice(InvoiceId::new());
        let change = PaymentChange::updated(Some(a), Some(b));
        assert_eq!(change.affected_documents(), vec![a, b]);
    }

    #[test]
    fn test_amount_edit_affects_target_once() {
        let a = DocumentRef::TruckHiringNote(TruckHiringNoteId::new());
        let change = PaymentChange::updated(Some(a), Some(a));
        assert_eq!(change.affected_documents(), vec![a]);
    }

    #[test]
    fn test_delete_affects_former_target() {
        let a = DocumentRef::TruckHiringNote(TruckHiringNoteId::new());
        let change = PaymentChange::deleted(Some(a));
        assert_eq!(change.affected_documents(), vec![a]);
    }
}
