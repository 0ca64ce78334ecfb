//! Invoice DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_freight::{GstType, Invoice};
use domain_ledger::SettlementStatus;

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub date: NaiveDate,
    pub customer_id: Uuid,
    pub lorry_receipt_ids: Vec<Uuid>,
    pub currency: Option<String>,
    pub gst_type: Option<GstType>,
    pub cgst_rate: Option<Decimal>,
    pub sgst_rate: Option<Decimal>,
    pub igst_rate: Option<Decimal>,
    #[serde(default)]
    pub is_rcm: bool,
    #[serde(default)]
    pub is_manual_gst: bool,
    pub cgst_amount: Option<Decimal>,
    pub sgst_amount: Option<Decimal>,
    pub igst_amount: Option<Decimal>,
    pub remarks: Option<String>,
}

/// Partial edit: absent fields keep their stored values
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub date: Option<NaiveDate>,
    /// Replaces the covered receipt set; receipts dropped from the set are
    /// released back to Delivered
    pub lorry_receipt_ids: Option<Vec<Uuid>>,
    pub gst_type: Option<GstType>,
    pub cgst_rate: Option<Decimal>,
    pub sgst_rate: Option<Decimal>,
    pub igst_rate: Option<Decimal>,
    pub is_rcm: Option<bool>,
    pub is_manual_gst: Option<bool>,
    pub cgst_amount: Option<Decimal>,
    pub sgst_amount: Option<Decimal>,
    pub igst_amount: Option<Decimal>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: i64,
    pub date: NaiveDate,
    pub customer_id: Uuid,
    pub lorry_receipt_ids: Vec<Uuid>,
    pub total_amount: Decimal,
    pub gst_type: GstType,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    pub grand_total: Decimal,
    pub is_rcm: bool,
    pub paid_amount: Decimal,
    pub balance_payable: Decimal,
    pub status: SettlementStatus,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: Uuid::from(invoice.id),
            invoice_number: invoice.invoice_number,
            date: invoice.date,
            customer_id: Uuid::from(invoice.customer_id),
            lorry_receipt_ids: invoice.lorry_receipt_ids.iter().copied().map(Uuid::from).collect(),
            total_amount: invoice.total_amount.amount(),
            gst_type: invoice.gst_type,
            cgst_amount: invoice.cgst_amount.amount(),
            sgst_amount: invoice.sgst_amount.amount(),
            igst_amount: invoice.igst_amount.amount(),
            grand_total: invoice.grand_total.amount(),
            is_rcm: invoice.is_rcm,
            paid_amount: invoice.ledger.paid_amount.amount(),
            balance_payable: invoice.ledger.balance_payable.amount(),
            status: invoice.ledger.status,
            currency: invoice.total_amount.currency().code().to_string(),
            created_at: invoice.created_at,
        }
    }
}
