//! Test Data Builders
//!
//! Builders for test data with sensible defaults, so tests specify only
//! the fields the scenario cares about.

use chrono::NaiveDate;

use core_kernel::{CustomerId, Money};
use domain_freight::{FreightError, TruckHiringNote};
use domain_ledger::{DocumentRef, Payment, PaymentKind, PaymentMode};

use crate::fixtures::{FreightFixtures, MoneyFixtures, TemporalFixtures};

/// Builder for test payments with defaults: an NEFT receipt of 500 rupees,
/// unlinked
pub struct TestPaymentBuilder {
    customer_id: CustomerId,
    date: NaiveDate,
    amount: Money,
    kind: PaymentKind,
    mode: PaymentMode,
    target: Option<DocumentRef>,
}

impl Default for TestPaymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPaymentBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            customer_id: CustomerId::new(),
            date: TemporalFixtures::delivery_date(),
            amount: MoneyFixtures::inr(rust_decimal_macros::dec!(500)),
            kind: PaymentKind::Receipt,
            mode: PaymentMode::Neft,
            target: None,
        }
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the payment kind
    pub fn with_kind(mut self, kind: PaymentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the mode of transfer
    pub fn with_mode(mut self, mode: PaymentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Links the payment to a document
    pub fn with_target(mut self, target: DocumentRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the paying customer
    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// Builds the test payment
    pub fn build(self) -> Payment {
        let mut payment = Payment::new(self.customer_id, self.date, self.amount, self.kind, self.mode);
        payment.target = self.target;
        payment
    }
}

/// Builds a valid truck hiring note: Pune to Nagpur, charges totalling
/// 1250, advance 300
pub fn sample_truck_hiring_note(thn_number: i64) -> Result<TruckHiringNote, FreightError> {
    TruckHiringNote::builder(
        thn_number,
        TemporalFixtures::issue_date(),
        FreightFixtures::transporter_snapshot(),
        FreightFixtures::truck_number(),
        TemporalFixtures::delivery_date(),
    )
    .route("Pune", "Nagpur")
    .goods("Steel coils", rust_decimal_macros::dec!(18.5))
    .loading_date(TemporalFixtures::loading_date())
    .charges(FreightFixtures::thn_charges())
    .advance_paid(MoneyFixtures::advance())
    .build()
}
