//! Pre-Built Test Data
//!
//! Fixed, recognizable values for common entities so tests read as
//! scenarios rather than setup noise.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_freight::{Customer, ThnCharges, Transporter, TransporterSnapshot};
use domain_ledger::ChargeBreakdown;

/// Common money amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// INR amount from a decimal literal
    pub fn inr(amount: Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    /// Zero rupees
    pub fn zero() -> Money {
        Money::zero(Currency::INR)
    }

    /// The standard trip advance used across scenarios
    pub fn advance() -> Money {
        Self::inr(dec!(300))
    }
}

/// Common dates: a trip loaded in early June 2024
pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid fixture date")
    }

    pub fn loading_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 2).expect("valid fixture date")
    }

    pub fn delivery_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).expect("valid fixture date")
    }
}

/// Common freight entities
pub struct FreightFixtures;

impl FreightFixtures {
    /// A registered, active transporter
    pub fn transporter() -> Transporter {
        let mut transporter = Transporter::new("Patel Roadways");
        transporter.phone = Some("9822012345".to_string());
        transporter.pan = Some("ABCDE1234F".to_string());
        transporter
    }

    /// Snapshot of [`Self::transporter`]
    pub fn transporter_snapshot() -> TransporterSnapshot {
        TransporterSnapshot::from(&Self::transporter())
    }

    /// A billing customer in Maharashtra
    pub fn customer() -> Customer {
        let mut customer = Customer::new("Sharma Traders", "14 MIDC Road, Pune", "Maharashtra");
        customer.gstin = Some("27AAACS1234A1Z5".to_string());
        customer
    }

    /// A valid truck registration
    pub fn truck_number() -> &'static str {
        "MH 12 AB 1234"
    }

    /// Hire charges totalling 1250: 1000 freight, 200 fuel, 50 toll
    pub fn thn_charges() -> ThnCharges {
        ThnCharges {
            freight: MoneyFixtures::inr(dec!(1000)),
            fuel: MoneyFixtures::inr(dec!(200)),
            toll: MoneyFixtures::inr(dec!(50)),
            other: MoneyFixtures::zero(),
        }
    }

    /// The same charge set as generic component lines
    pub fn charge_breakdown() -> ChargeBreakdown {
        FreightFixtures::thn_charges().breakdown()
    }
}
