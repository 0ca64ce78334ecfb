//! Settlement status derivation

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;

/// How far a document's charges have been settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementStatus {
    /// Nothing received against the document
    #[serde(rename = "Unpaid")]
    Unpaid,
    /// Some, but not all, of the charges received
    #[serde(rename = "Partially Paid")]
    PartiallyPaid,
    /// Charges fully received (over-payment also lands here)
    #[serde(rename = "Paid")]
    Paid,
}

impl SettlementStatus {
    /// Derives the status from paid amount vs total charges
    ///
    /// `paid <= 0` is Unpaid, `paid >= total` is Paid (ties and
    /// over-payment both clamp to Paid), anything between is PartiallyPaid.
    pub fn derive(paid_amount: Money, total_charges: Money) -> Self {
        if !paid_amount.is_positive() {
            SettlementStatus::Unpaid
        } else if paid_amount.amount() >= total_charges.amount() {
            SettlementStatus::Paid
        } else {
            SettlementStatus::PartiallyPaid
        }
    }

    /// The label as stored and printed
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Unpaid => "Unpaid",
            SettlementStatus::PartiallyPaid => "Partially Paid",
            SettlementStatus::Paid => "Paid",
        }
    }
}

impl std::str::FromStr for SettlementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(SettlementStatus::Unpaid),
            "Partially Paid" => Ok(SettlementStatus::PartiallyPaid),
            "Paid" => Ok(SettlementStatus::Paid),
            other => Err(format!("unknown settlement status: {other}")),
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn inr(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    #[test]
    fn test_derivation_round_trip() {
        let total = inr(dec!(1000));

        assert_eq!(
            SettlementStatus::derive(inr(dec!(0)), total),
            SettlementStatus::Unpaid
        );
        assert_eq!(
            SettlementStatus::derive(inr(dec!(400)), total),
            SettlementStatus::PartiallyPaid
        );
        assert_eq!(
            SettlementStatus::derive(inr(dec!(1000)), total),
            SettlementStatus::Paid
        );
        // Over-payment clamps to Paid, not a new state
        assert_eq!(
            SettlementStatus::derive(inr(dec!(1500)), total),
            SettlementStatus::Paid
        );
    }

    #[test]
    fn test_zero_total_zero_paid_is_unpaid() {
        // The paid <= 0 rule wins over paid >= total
        assert_eq!(
            SettlementStatus::derive(inr(dec!(0)), inr(dec!(0))),
            SettlementStatus::Unpaid
        );
    }

    #[test]
    fn test_serde_uses_display_labels() {
        let json = serde_json::to_string(&SettlementStatus::PartiallyPaid).unwrap();
        assert_eq!(json, "\"Partially Paid\"");
    }
}
