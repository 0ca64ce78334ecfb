//! Lorry receipt DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{Currency, Money};
use domain_freight::{LorryReceipt, LorryReceiptCharges, LorryReceiptStatus};

#[derive(Debug, Deserialize)]
pub struct CreateLorryReceiptRequest {
    pub date: NaiveDate,
    pub consignor_id: Uuid,
    pub consignee_id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_number: String,
    pub from_location: String,
    pub to_location: String,
    pub currency: Option<String>,
    pub charges: Option<LorryReceiptChargesRequest>,
}

#[derive(Debug, Deserialize)]
pub struct LorryReceiptChargesRequest {
    pub freight: Decimal,
    #[serde(default)]
    pub aoc: Decimal,
    #[serde(default)]
    pub hamali: Decimal,
    #[serde(default)]
    pub b_ch: Decimal,
    #[serde(default)]
    pub tr_ch: Decimal,
    #[serde(default)]
    pub detention_ch: Decimal,
}

impl LorryReceiptChargesRequest {
    pub fn into_charges(self, currency: Currency) -> LorryReceiptCharges {
        LorryReceiptCharges {
            freight: Money::new(self.freight, currency),
            aoc: Money::new(self.aoc, currency),
            hamali: Money::new(self.hamali, currency),
            b_ch: Money::new(self.b_ch, currency),
            tr_ch: Money::new(self.tr_ch, currency),
            detention_ch: Money::new(self.detention_ch, currency),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: LorryReceiptStatus,
    pub delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct LorryReceiptResponse {
    pub id: Uuid,
    pub lr_number: i64,
    pub date: NaiveDate,
    pub status: LorryReceiptStatus,
    pub consignor_id: Uuid,
    pub consignee_id: Uuid,
    pub vehicle_number: String,
    pub from_location: String,
    pub to_location: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<&LorryReceipt> for LorryReceiptResponse {
    fn from(receipt: &LorryReceipt) -> Self {
        Self {
            id: Uuid::from(receipt.id),
            lr_number: receipt.lr_number,
            date: receipt.date,
            status: receipt.status,
            consignor_id: Uuid::from(receipt.consignor_id),
            consignee_id: Uuid::from(receipt.consignee_id),
            vehicle_number: receipt.vehicle_number.clone(),
            from_location: receipt.from_location.clone(),
            to_location: receipt.to_location.clone(),
            total_amount: receipt.total_amount.amount(),
            currency: receipt.total_amount.currency().code().to_string(),
            created_at: receipt.created_at,
        }
    }
}
