//! Charge breakdowns and total computation
//!
//! The charge calculator is a pure function over a document's itemized
//! charge components. The component set differs per document type (freight,
//! fuel, toll for a truck hiring note; freight, hamali, detention for a
//! lorry receipt) but the aggregation rule is identical everywhere.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};

use crate::error::LedgerError;

/// A single named charge component on a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLine {
    /// Field name as it appears on the document (e.g. "freight", "toll")
    pub name: String,
    /// Non-negative monetary amount
    pub amount: Money,
}

impl ChargeLine {
    /// Creates a charge line
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// An ordered set of named charge components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    currency: Currency,
    lines: Vec<ChargeLine>,
}

impl ChargeBreakdown {
    /// Creates an empty breakdown in the given currency
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            lines: Vec::new(),
        }
    }

    /// Appends a named component (builder style)
    pub fn line(mut self, name: impl Into<String>, amount: Money) -> Self {
        self.lines.push(ChargeLine::new(name, amount));
        self
    }

    /// Returns the breakdown's currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the component lines in document order
    pub fn lines(&self) -> &[ChargeLine] {
        &self.lines
    }

    /// Sums all components
    ///
    /// # Errors
    ///
    /// Returns `NegativeCharge` naming the first negative component, or a
    /// money error on currency mismatch between lines.
    pub fn total(&self) -> Result<Money, LedgerError> {
        let mut total = Money::zero(self.currency);
        for line in &self.lines {
            if line.amount.is_negative() {
                return Err(LedgerError::NegativeCharge {
                    name: line.name.clone(),
                    amount: line.amount,
                });
            }
            total = total.checked_add(&line.amount)?;
        }
        Ok(total)
    }
}

/// Derived totals for a chargeable document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeTotals {
    /// Sum of all charge components
    pub total_charges: Money,
    /// `total_charges - advance_paid - settled`
    pub balance_payable: Money,
}

/// Computes a document's derived totals from its charge components
///
/// `settled` is the sum of linked payment-ledger amounts; pass zero when
/// computing totals for a document whose ledger has not been touched.
/// Callers must invoke this before every persist of a document whose
/// components or advance changed so derived fields are never stored stale.
///
/// # Errors
///
/// Returns `NegativeCharge` for any negative component. Advance validation
/// against the fresh total is the upsert boundary's job, not this
/// function's.
pub fn compute_totals(
    charges: &ChargeBreakdown,
    advance_paid: Money,
    settled: Money,
) -> Result<ChargeTotals, LedgerError> {
    let total_charges = charges.total()?;
    let balance_payable = total_charges
        .checked_sub(&advance_paid)?
        .checked_sub(&settled)?;
    Ok(ChargeTotals {
        total_charges,
        balance_payable,
    })
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
    fn test_total_sums_components() {
        let charges = ChargeBreakdown::new(Currency::INR)
            .line("freight", inr(dec!(1000)))
            .line("fuel", inr(dec!(200)))
            .line("toll", inr(dec!(50)))
            .line("other", inr(dec!(0)));

        assert_eq!(charges.total().unwrap().amount(), dec!(1250));
    }

    #[test]
    fn test_empty_breakdown_totals_zero() {
        let charges = ChargeBreakdown::new(Currency::INR);
        assert!(charges.total().unwrap().is_zero());
    }

    #[test]
    fn test_negative_component_rejected() {
        let charges = ChargeBreakdown::new(Currency::INR)
            .line("freight", inr(dec!(1000)))
            .line("toll", inr(dec!(-50)));

        let err = charges.total().unwrap_err();
        match err {
            LedgerError::NegativeCharge { name, .. } => assert_eq!(name, "toll"),
            other => panic!("expected NegativeCharge, got {other}"),
        }
    }

    #[test]
    fn test_compute_totals_with_advance() {
        let charges = ChargeBreakdown::new(Currency::INR)
            .line("freight", inr(dec!(1000)))
            .line("fuel", inr(dec!(200)))
            .line("toll", inr(dec!(50)))
            .line("other", inr(dec!(0)));

        let totals = compute_totals(&charges, inr(dec!(300)), Money::zero(Currency::INR)).unwrap();
        assert_eq!(totals.total_charges.amount(), dec!(1250));
        assert_eq!(totals.balance_payable.amount(), dec!(950));
    }

    #[test]
    fn test_compute_totals_with_settlements() {
        let charges = ChargeBreakdown::new(Currency::INR).line("freight", inr(dec!(1000)));

        let totals = compute_totals(&charges, inr(dec!(100)), inr(dec!(400))).unwrap();
        assert_eq!(totals.balance_payable.amount(), dec!(500));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn total_equals_component_sum(amounts in proptest::collection::vec(0i64..10_000_000i64, 0..12)) {
            let mut charges = ChargeBreakdown::new(Currency::INR);
            let mut expected = Money::zero(Currency::INR);
            for (i, minor) in amounts.iter().enumerate() {
                let amount = Money::from_minor(*minor, Currency::INR);
                charges = charges.line(format!("component{i}"), amount);
                expected = expected + amount;
            }
            prop_assert_eq!(charges.total().unwrap(), expected);
        }

        #[test]
        fn any_negative_component_fails(
            positives in proptest::collection::vec(0i64..1_000_000i64, 0..6),
            negative in -1_000_000i64..-1i64
        ) {
            let mut charges = ChargeBreakdown::new(Currency::INR);
            for (i, minor) in positives.iter().enumerate() {
                charges = charges.line(format!("c{i}"), Money::from_minor(*minor, Currency::INR));
            }
            charges = charges.line("bad", Money::from_minor(negative, Currency::INR));
            prop_assert!(charges.total().is_err());
        }
    }
}
