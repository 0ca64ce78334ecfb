//! Lorry receipts
//!
//! The lorry receipt (LR) is issued when goods are loaded: it names the
//! consignor and consignee, describes the packages, and itemizes the
//! carriage charges. LRs move through a forward-only lifecycle and are
//! billed to the customer through an invoice; they are never settled
//! directly against the payment ledger.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Currency, CustomerId, LorryReceiptId, Money, VehicleId};
use domain_ledger::ChargeBreakdown;

use crate::error::FreightError;
use crate::validation::require_non_empty;

/// Who bears the GST on the carriage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstPayableBy {
    Consignor,
    Consignee,
    Transporter,
}

/// Lorry receipt lifecycle
///
/// The lifecycle only moves forward; skipping stages is allowed (a receipt
/// can go straight from Created to Delivered) but never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LorryReceiptStatus {
    Created,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
    Invoiced,
    Paid,
}

impl LorryReceiptStatus {
    fn rank(self) -> u8 {
        match self {
            LorryReceiptStatus::Created => 0,
            LorryReceiptStatus::InTransit => 1,
            LorryReceiptStatus::Delivered => 2,
            LorryReceiptStatus::Invoiced => 3,
            LorryReceiptStatus::Paid => 4,
        }
    }

    /// Whether the lifecycle permits moving to `next`
    pub fn can_transition_to(self, next: LorryReceiptStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for LorryReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LorryReceiptStatus::Created => "Created",
            LorryReceiptStatus::InTransit => "In Transit",
            LorryReceiptStatus::Delivered => "Delivered",
            LorryReceiptStatus::Invoiced => "Invoiced",
            LorryReceiptStatus::Paid => "Paid",
        };
        write!(f, "{label}")
    }
}

/// One package line on the receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageLine {
    pub count: u32,
    pub packing_method: String,
    pub description: String,
    /// Weight on the weighbridge slip
    pub actual_weight: Decimal,
    /// Weight the freight is charged on
    pub charged_weight: Decimal,
}

/// The itemized carriage charges on a lorry receipt
///
/// Field names follow the printed LR form: AOC (additional operational
/// charges), hamali (loading labour), B.Ch (bilty charge), Tr.Ch (transit
/// charge), detention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LorryReceiptCharges {
    pub freight: Money,
    pub aoc: Money,
    pub hamali: Money,
    pub b_ch: Money,
    pub tr_ch: Money,
    pub detention_ch: Money,
}

impl LorryReceiptCharges {
    /// All-zero charges in the given currency
    pub fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            freight: zero,
            aoc: zero,
            hamali: zero,
            b_ch: zero,
            tr_ch: zero,
            detention_ch: zero,
        }
    }

    /// The charges as named component lines, in form order
    pub fn breakdown(&self) -> ChargeBreakdown {
        ChargeBreakdown::new(self.freight.currency())
            .line("freight", self.freight)
            .line("aoc", self.aoc)
            .line("hamali", self.hamali)
            .line("bCh", self.b_ch)
            .line("trCh", self.tr_ch)
            .line("detentionCh", self.detention_ch)
    }

    /// Sums the components
    ///
    /// # Errors
    ///
    /// Returns a ledger error naming the first negative component.
    pub fn total(&self) -> Result<Money, FreightError> {
        Ok(self.breakdown().total()?)
    }
}

/// Transit insurance block, filled when the consignor declared cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceDetails {
    pub has_insured: bool,
    pub company: Option<String>,
    pub policy_no: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub risk: Option<String>,
}

impl InsuranceDetails {
    /// The uninsured default
    pub fn none() -> Self {
        Self {
            has_insured: false,
            company: None,
            policy_no: None,
            date: None,
            amount: None,
            risk: None,
        }
    }
}

/// A lorry receipt document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LorryReceipt {
    /// Unique identifier
    pub id: LorryReceiptId,
    /// Allocated document number
    pub lr_number: i64,
    /// Issue date
    pub date: NaiveDate,
    /// Date goods reported at destination
    pub reporting_date: Option<NaiveDate>,
    /// Date goods were delivered
    pub delivery_date: Option<NaiveDate>,
    /// Party shipping the goods
    pub consignor_id: CustomerId,
    /// Party receiving the goods
    pub consignee_id: CustomerId,
    /// Carrying vehicle
    pub vehicle_id: VehicleId,
    /// Registration number of the carrying vehicle at issue time
    pub vehicle_number: String,
    pub from_location: String,
    pub to_location: String,
    /// Package lines
    pub packages: Vec<PackageLine>,
    /// Itemized carriage charges
    pub charges: LorryReceiptCharges,
    /// Derived sum of the charge components
    pub total_amount: Money,
    pub e_way_bill_no: Option<String>,
    /// Declared value of the goods
    pub value_of_goods: Money,
    pub gst_payable_by: GstPayableBy,
    pub status: LorryReceiptStatus,
    pub insurance: InsuranceDetails,
    /// Seal number on the container/body, if sealed
    pub seal_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LorryReceipt {
    /// Creates a receipt in Created status with zero charges
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when origin or destination is blank.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lr_number: i64,
        date: NaiveDate,
        consignor_id: CustomerId,
        consignee_id: CustomerId,
        vehicle_id: VehicleId,
        vehicle_number: impl Into<String>,
        from_location: impl Into<String>,
        to_location: impl Into<String>,
        currency: Currency,
    ) -> Result<Self, FreightError> {
        let from_location = from_location.into();
        let to_location = to_location.into();
        require_non_empty(&from_location, "from")?;
        require_non_empty(&to_location, "to")?;

        let now = Utc::now();
        Ok(Self {
            id: LorryReceiptId::new_v7(),
            lr_number,
            date,
            reporting_date: None,
            delivery_date: None,
            consignor_id,
            consignee_id,
            vehicle_id,
            vehicle_number: vehicle_number.into(),
            from_location,
            to_location,
            packages: Vec::new(),
            charges: LorryReceiptCharges::zero(currency),
            total_amount: Money::zero(currency),
            e_way_bill_no: None,
            value_of_goods: Money::zero(currency),
            gst_payable_by: GstPayableBy::Consignor,
            status: LorryReceiptStatus::Created,
            insurance: InsuranceDetails::none(),
            seal_no: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the charges and recomputes the stored total
    ///
    /// # Errors
    ///
    /// Returns a ledger error for any negative component.
    pub fn set_charges(&mut self, charges: LorryReceiptCharges) -> Result<(), FreightError> {
        self.total_amount = charges.total()?;
        self.charges = charges;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the receipt forward in its lifecycle
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` on a backward or same-stage move.
    pub fn transition_to(&mut self, next: LorryReceiptStatus) -> Result<(), FreightError> {
        if !self.status.can_transition_to(next) {
            return Err(FreightError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Records delivery and moves to Delivered
    pub fn mark_delivered(&mut self, delivery_date: NaiveDate) -> Result<(), FreightError> {
        self.delivery_date = Some(delivery_date);
        self.transition_to(LorryReceiptStatus::Delivered)
    }

    /// Returns the receipt to Delivered after its covering invoice is
    /// deleted, so it can be billed again
    ///
    /// This is the one permitted backward move in the lifecycle and it
    /// only applies from Invoiced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` from any status other than
    /// Invoiced.
    pub fn release_from_invoice(&mut self) -> Result<(), FreightError> {
        if self.status != LorryReceiptStatus::Invoiced {
            return Err(FreightError::InvalidStatusTransition {
                from: self.status,
                to: LorryReceiptStatus::Delivered,
            });
        }
        self.status = LorryReceiptStatus::Delivered;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inr(amount: Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    fn sample_receipt() -> LorryReceipt {
        LorryReceipt::new(
            101,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            CustomerId::new(),
            CustomerId::new(),
            VehicleId::new(),
            "MH 12 AB 1234",
            "Pune",
            "Nagpur",
            Currency::INR,
        )
        .unwrap()
    }

    #[test]
    fn test_new_receipt_requires_locations() {
        let result = LorryReceipt::new(
            101,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            CustomerId::new(),
            CustomerId::new(),
            VehicleId::new(),
            "MH 12 AB 1234",
            "",
            "Nagpur",
            Currency::INR,
        );
        assert!(matches!(result, Err(FreightError::MissingField("from"))));
    }

    #[test]
    fn test_set_charges_recomputes_total() {
        let mut receipt = sample_receipt();
        let mut charges = LorryReceiptCharges::zero(Currency::INR);
        charges.freight = inr(dec!(5000));
        charges.hamali = inr(dec!(250));
        charges.detention_ch = inr(dec!(100));

        receipt.set_charges(charges).unwrap();
        assert_eq!(receipt.total_amount.amount(), dec!(5350));
    }

    #[test]
    fn test_negative_charge_rejected() {
        let mut receipt = sample_receipt();
        let mut charges = LorryReceiptCharges::zero(Currency::INR);
        charges.aoc = inr(dec!(-10));

        assert!(receipt.set_charges(charges).is_err());
        // Stored total untouched on failure
        assert!(receipt.total_amount.is_zero());
    }

    #[test]
    fn test_lifecycle_moves_forward_only() {
        let mut receipt = sample_receipt();
        receipt.transition_to(LorryReceiptStatus::InTransit).unwrap();
        receipt.mark_delivered(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()).unwrap();
        receipt.transition_to(LorryReceiptStatus::Invoiced).unwrap();

        let err = receipt.transition_to(LorryReceiptStatus::InTransit).unwrap_err();
        assert!(matches!(err, FreightError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn test_stage_skipping_is_allowed() {
        let mut receipt = sample_receipt();
        receipt.transition_to(LorryReceiptStatus::Delivered).unwrap();
        assert_eq!(receipt.status, LorryReceiptStatus::Delivered);
    }

    #[test]
    fn test_release_returns_invoiced_receipt_to_delivered() {
        let mut receipt = sample_receipt();
        receipt.mark_delivered(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()).unwrap();
        receipt.transition_to(LorryReceiptStatus::Invoiced).unwrap();

        receipt.release_from_invoice().unwrap();
        assert_eq!(receipt.status, LorryReceiptStatus::Delivered);
        // Released receipts can be billed again
        assert!(receipt.status.can_transition_to(LorryReceiptStatus::Invoiced));
    }

    #[test]
    fn test_release_only_applies_to_invoiced_receipts() {
        let mut receipt = sample_receipt();
        receipt.transition_to(LorryReceiptStatus::Delivered).unwrap();

        let err = receipt.release_from_invoice().unwrap_err();
        assert!(matches!(err, FreightError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn test_status_serde_labels() {
        let json = serde_json::to_string(&LorryReceiptStatus::InTransit).unwrap();
        assert_eq!(json, "\"In Transit\"");
    }
}
