//! Payment DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{InvoiceId, TruckHiringNoteId};
use domain_ledger::{DocumentRef, Payment, PaymentKind, PaymentMode};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub kind: PaymentKind,
    pub mode: PaymentMode,
    /// At most one of `invoice_id`/`thn_id` may be set
    pub invoice_id: Option<Uuid>,
    pub thn_id: Option<Uuid>,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
}

impl PaymentRequest {
    /// Resolves the settlement target from the two link fields
    pub fn target(&self) -> Result<Option<DocumentRef>, ApiError> {
        match (self.invoice_id, self.thn_id) {
            (Some(_), Some(_)) => Err(ApiError::BadRequest(
                "a payment settles at most one document".to_string(),
            )),
            (Some(id), None) => Ok(Some(DocumentRef::Invoice(InvoiceId::from(id)))),
            (None, Some(id)) => Ok(Some(DocumentRef::TruckHiringNote(
                TruckHiringNoteId::from(id),
            ))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub kind: PaymentKind,
    pub mode: PaymentMode,
    pub invoice_id: Option<Uuid>,
    pub thn_id: Option<Uuid>,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        let (invoice_id, thn_id) = match payment.target {
            Some(DocumentRef::Invoice(id)) => (Some(Uuid::from(id)), None),
            Some(DocumentRef::TruckHiringNote(id)) => (None, Some(Uuid::from(id))),
            None => (None, None),
        };
        Self {
            id: Uuid::from(payment.id),
            customer_id: Uuid::from(payment.customer_id),
            date: payment.date,
            amount: payment.amount.amount(),
            currency: payment.amount.currency().code().to_string(),
            kind: payment.kind,
            mode: payment.mode,
            invoice_id,
            thn_id,
            reference_no: payment.reference_no.clone(),
            notes: payment.notes.clone(),
            created_at: payment.created_at,
        }
    }
}
