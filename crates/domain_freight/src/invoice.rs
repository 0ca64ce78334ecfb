//! Customer invoices
//!
//! An invoice bills a customer for the freight on one or more lorry
//! receipts. GST is applied on top of the freight total per the stored
//! rates; the grand total is what the customer owes and what the payment
//! ledger settles against.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, CustomerId, InvoiceId, LorryReceiptId, Money, Rate};
use domain_ledger::{ChargeBreakdown, LedgerFields};

use crate::error::FreightError;
use crate::lorry_receipt::LorryReceipt;

/// GST regime applied to the invoice
///
/// Intra-state supplies split the tax into CGST and SGST halves;
/// inter-state supplies levy IGST instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstType {
    #[serde(rename = "CGST/SGST")]
    CgstSgst,
    #[serde(rename = "IGST")]
    Igst,
}

/// A freight invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Allocated document number
    pub invoice_number: i64,
    /// Issue date
    pub date: NaiveDate,
    /// Customer being billed
    pub customer_id: CustomerId,
    /// Lorry receipts covered by this invoice
    pub lorry_receipt_ids: Vec<LorryReceiptId>,
    /// Freight total across the covered receipts
    pub total_amount: Money,
    pub remarks: Option<String>,
    pub gst_type: GstType,
    pub cgst_rate: Rate,
    pub sgst_rate: Rate,
    pub igst_rate: Rate,
    /// Derived from the rates unless `is_manual_gst`
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    /// Freight total plus GST; what the ledger settles against
    pub grand_total: Money,
    /// Reverse charge mechanism: the recipient pays the GST, so the
    /// invoice levies none
    pub is_rcm: bool,
    /// Operator entered the GST amounts by hand; `compute_gst` keeps them
    pub is_manual_gst: bool,
    /// Derived settlement fields, written only by the reconciler
    pub ledger: LedgerFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates an empty intra-state invoice with zero rates
    pub fn new(
        invoice_number: i64,
        date: NaiveDate,
        customer_id: CustomerId,
        currency: Currency,
    ) -> Self {
        let zero = Money::zero(currency);
        let now = Utc::now();
        Self {
            id: InvoiceId::new_v7(),
            invoice_number,
            date,
            customer_id,
            lorry_receipt_ids: Vec::new(),
            total_amount: zero,
            remarks: None,
            gst_type: GstType::CgstSgst,
            cgst_rate: Rate::zero(),
            sgst_rate: Rate::zero(),
            igst_rate: Rate::zero(),
            cgst_amount: zero,
            sgst_amount: zero,
            igst_amount: zero,
            grand_total: zero,
            is_rcm: false,
            is_manual_gst: false,
            ledger: LedgerFields::unpaid(currency),
            created_at: now,
            updated_at: now,
        }
    }

    /// Covers the given lorry receipts, summing their freight totals
    ///
    /// # Errors
    ///
    /// Returns `NoLorryReceipts` for an empty set; money errors propagate
    /// on currency mismatch between receipts.
    pub fn cover_lorry_receipts(&mut self, receipts: &[LorryReceipt]) -> Result<(), FreightError> {
        if receipts.is_empty() {
            return Err(FreightError::NoLorryReceipts);
        }
        let mut total = Money::zero(self.total_amount.currency());
        for receipt in receipts {
            total = total.checked_add(&receipt.total_amount)?;
        }
        self.lorry_receipt_ids = receipts.iter().map(|r| r.id).collect();
        self.total_amount = total;
        self.compute_gst()
    }

    /// Recomputes the GST amounts and grand total from the stored rates
    ///
    /// Manual-GST invoices keep their entered amounts; RCM invoices levy
    /// no GST at all. Either way the grand total is re-derived.
    pub fn compute_gst(&mut self) -> Result<(), FreightError> {
        let currency = self.total_amount.currency();
        if !self.is_manual_gst {
            if self.is_rcm {
                self.cgst_amount = Money::zero(currency);
                self.sgst_amount = Money::zero(currency);
                self.igst_amount = Money::zero(currency);
            } else {
                match self.gst_type {
                    GstType::CgstSgst => {
                        self.cgst_amount =
                            self.cgst_rate.apply(&self.total_amount).round_to_currency();
                        self.sgst_amount =
                            self.sgst_rate.apply(&self.total_amount).round_to_currency();
                        self.igst_amount = Money::zero(currency);
                    }
                    GstType::Igst => {
                        self.igst_amount =
                            self.igst_rate.apply(&self.total_amount).round_to_currency();
                        self.cgst_amount = Money::zero(currency);
                        self.sgst_amount = Money::zero(currency);
                    }
                }
            }
        }
        self.grand_total = self
            .total_amount
            .checked_add(&self.cgst_amount)?
            .checked_add(&self.sgst_amount)?
            .checked_add(&self.igst_amount)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The invoice's charges as named component lines
    ///
    /// Totals to the grand total; this is what settlement is computed
    /// against.
    pub fn charge_breakdown(&self) -> ChargeBreakdown {
        ChargeBreakdown::new(self.total_amount.currency())
            .line("freight", self.total_amount)
            .line("cgst", self.cgst_amount)
            .line("sgst", self.sgst_amount)
            .line("igst", self.igst_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::VehicleId;
    use rust_decimal_macros::dec;

    use crate::lorry_receipt::LorryReceiptCharges;

    fn inr(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    fn receipt_with_freight(lr_number: i64, freight: Money) -> LorryReceipt {
        let mut receipt = LorryReceipt::new(
            lr_number,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            CustomerId::new(),
            CustomerId::new(),
            VehicleId::new(),
            "MH 12 AB 1234",
            "Pune",
            "Nagpur",
            Currency::INR,
        )
        .unwrap();
        let mut charges = LorryReceiptCharges::zero(Currency::INR);
        charges.freight = freight;
        receipt.set_charges(charges).unwrap();
        receipt
    }

    fn sample_invoice() -> Invoice {
        Invoice::new(
            42,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            CustomerId::new(),
            Currency::INR,
        )
    }

    #[test]
    fn test_empty_receipt_set_rejected() {
        let mut invoice = sample_invoice();
        assert!(matches!(
            invoice.cover_lorry_receipts(&[]),
            Err(FreightError::NoLorryReceipts)
        ));
    }

    #[test]
    fn test_cover_sums_receipt_totals() {
        let mut invoice = sample_invoice();
        let receipts = vec![
            receipt_with_freight(101, inr(dec!(5000))),
            receipt_with_freight(102, inr(dec!(3000))),
        ];
        invoice.cover_lorry_receipts(&receipts).unwrap();

        assert_eq!(invoice.total_amount.amount(), dec!(8000));
        assert_eq!(invoice.lorry_receipt_ids.len(), 2);
    }

    #[test]
    fn test_intra_state_gst_split() {
        let mut invoice = sample_invoice();
        invoice.cgst_rate = Rate::from_percentage(dec!(6));
        invoice.sgst_rate = Rate::from_percentage(dec!(6));
        invoice
            .cover_lorry_receipts(&[receipt_with_freight(101, inr(dec!(10000)))])
            .unwrap();

        assert_eq!(invoice.cgst_amount.amount(), dec!(600));
        assert_eq!(invoice.sgst_amount.amount(), dec!(600));
        assert!(invoice.igst_amount.is_zero());
        assert_eq!(invoice.grand_total.amount(), dec!(11200));
    }

    #[test]
    fn test_inter_state_gst() {
        let mut invoice = sample_invoice();
        invoice.gst_type = GstType::Igst;
        invoice.igst_rate = Rate::from_percentage(dec!(12));
        invoice
            .cover_lorry_receipts(&[receipt_with_freight(101, inr(dec!(10000)))])
            .unwrap();

        assert_eq!(invoice.igst_amount.amount(), dec!(1200));
        assert!(invoice.cgst_amount.is_zero());
        assert_eq!(invoice.grand_total.amount(), dec!(11200));
    }

    #[test]
    fn test_rcm_levies_no_gst() {
        let mut invoice = sample_invoice();
        invoice.is_rcm = true;
        invoice.cgst_rate = Rate::from_percentage(dec!(6));
        invoice.sgst_rate = Rate::from_percentage(dec!(6));
        invoice
            .cover_lorry_receipts(&[receipt_with_freight(101, inr(dec!(10000)))])
            .unwrap();

        assert!(invoice.cgst_amount.is_zero());
        assert_eq!(invoice.grand_total.amount(), dec!(10000));
    }

    #[test]
    fn test_manual_gst_amounts_kept() {
        let mut invoice = sample_invoice();
        invoice.is_manual_gst = true;
        invoice.cgst_amount = inr(dec!(550));
        invoice.sgst_amount = inr(dec!(550));
        invoice
            .cover_lorry_receipts(&[receipt_with_freight(101, inr(dec!(10000)))])
            .unwrap();

        assert_eq!(invoice.cgst_amount.amount(), dec!(550));
        assert_eq!(invoice.grand_total.amount(), dec!(11100));
    }

    #[test]
    fn test_breakdown_totals_grand_total() {
        let mut invoice = sample_invoice();
        invoice.gst_type = GstType::Igst;
        invoice.igst_rate = Rate::from_percentage(dec!(5));
        invoice
            .cover_lorry_receipts(&[receipt_with_freight(101, inr(dec!(4000)))])
            .unwrap();

        let total = invoice.charge_breakdown().total().unwrap();
        assert_eq!(total, invoice.grand_total);
    }
}
