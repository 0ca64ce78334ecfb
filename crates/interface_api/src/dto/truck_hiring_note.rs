//! Truck hiring note DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{Currency, Money};
use domain_freight::{PaymentTerms, ThnCharges, TransporterSnapshot, TruckHiringNote};
use domain_ledger::SettlementStatus;

#[derive(Debug, Deserialize)]
pub struct CreateTruckHiringNoteRequest {
    pub date: NaiveDate,
    /// Registered transporter; when absent, `transporter` must carry the
    /// ad-hoc party fields
    pub transporter_id: Option<Uuid>,
    pub transporter: Option<TransporterSnapshotRequest>,
    pub truck_number: String,
    pub origin: String,
    pub destination: String,
    pub goods_type: String,
    #[serde(default)]
    pub weight: Decimal,
    pub loading_date: Option<NaiveDate>,
    pub expected_delivery_date: NaiveDate,
    pub currency: Option<String>,
    pub charges: ThnChargesRequest,
    pub advance_paid: Option<Decimal>,
    pub payment_terms: Option<PaymentTerms>,
    pub payment_reference: Option<String>,
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Deserialize)]
pub struct TransporterSnapshotRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub pan: Option<String>,
}

impl From<TransporterSnapshotRequest> for TransporterSnapshot {
    fn from(request: TransporterSnapshotRequest) -> Self {
        Self {
            name: request.name,
            phone: request.phone,
            address: request.address,
            gstin: request.gstin,
            pan: request.pan,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ThnChargesRequest {
    pub freight: Decimal,
    #[serde(default)]
    pub fuel: Decimal,
    #[serde(default)]
    pub toll: Decimal,
    #[serde(default)]
    pub other: Decimal,
}

impl ThnChargesRequest {
    pub fn into_charges(self, currency: Currency) -> ThnCharges {
        ThnCharges {
            freight: Money::new(self.freight, currency),
            fuel: Money::new(self.fuel, currency),
            toll: Money::new(self.toll, currency),
            other: Money::new(self.other, currency),
        }
    }
}

/// Partial edit: absent fields keep their stored values
#[derive(Debug, Deserialize)]
pub struct UpdateTruckHiringNoteRequest {
    pub date: Option<NaiveDate>,
    pub truck_number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub goods_type: Option<String>,
    pub weight: Option<Decimal>,
    pub loading_date: Option<NaiveDate>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub charges: Option<ThnChargesRequest>,
    pub advance_paid: Option<Decimal>,
    pub payment_terms: Option<PaymentTerms>,
    pub payment_reference: Option<String>,
    pub special_instructions: Option<String>,
    pub is_draft: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AttachPodRequest {
    pub image_key: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkRemindedRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct TruckHiringNoteResponse {
    pub id: Uuid,
    pub thn_number: i64,
    pub date: NaiveDate,
    pub transporter_id: Option<Uuid>,
    pub transporter_name: String,
    pub truck_number: String,
    pub origin: String,
    pub destination: String,
    pub expected_delivery_date: NaiveDate,
    pub total_charges: Decimal,
    pub advance_paid: Decimal,
    pub paid_amount: Decimal,
    pub balance_payable: Decimal,
    pub status: SettlementStatus,
    pub is_draft: bool,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<&TruckHiringNote> for TruckHiringNoteResponse {
    fn from(note: &TruckHiringNote) -> Self {
        Self {
            id: Uuid::from(note.id),
            thn_number: note.thn_number,
            date: note.date,
            transporter_id: note.transporter_id.map(Uuid::from),
            transporter_name: note.transporter.name.clone(),
            truck_number: note.truck_number.clone(),
            origin: note.origin.clone(),
            destination: note.destination.clone(),
            expected_delivery_date: note.expected_delivery_date,
            total_charges: note.ledger.total_charges.amount(),
            advance_paid: note.ledger.advance_paid.amount(),
            paid_amount: note.ledger.paid_amount.amount(),
            balance_payable: note.ledger.balance_payable.amount(),
            status: note.ledger.status,
            is_draft: note.is_draft,
            currency: note.ledger.total_charges.currency().code().to_string(),
            created_at: note.created_at,
        }
    }
}
