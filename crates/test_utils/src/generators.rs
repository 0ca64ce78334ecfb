//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use proptest::prelude::*;

use core_kernel::{Currency, Money};
use domain_ledger::{ChargeBreakdown, PaymentKind, PaymentMode};
use domain_numbering::SequenceKey;

/// Strategy for non-negative INR amounts in paise
pub fn charge_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..100_000_000i64
}

/// Strategy for strictly positive INR amounts in paise
pub fn payment_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for non-negative INR Money values
pub fn charge_money_strategy() -> impl Strategy<Value = Money> {
    charge_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::INR))
}

/// Strategy for strictly positive INR Money values
pub fn payment_money_strategy() -> impl Strategy<Value = Money> {
    payment_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::INR))
}

/// Strategy for charge breakdowns of up to eight non-negative components
pub fn charge_breakdown_strategy() -> impl Strategy<Value = ChargeBreakdown> {
    proptest::collection::vec(charge_minor_strategy(), 0..8).prop_map(|amounts| {
        let mut charges = ChargeBreakdown::new(Currency::INR);
        for (i, minor) in amounts.into_iter().enumerate() {
            charges = charges.line(format!("component{i}"), Money::from_minor(minor, Currency::INR));
        }
        charges
    })
}

/// Strategy for numbering domains
pub fn sequence_key_strategy() -> impl Strategy<Value = SequenceKey> {
    prop_oneof![
        Just(SequenceKey::LorryReceipt),
        Just(SequenceKey::Invoice),
        Just(SequenceKey::TruckHiringNote),
    ]
}

/// Strategy for valid number windows: `1 <= start <= end`
pub fn number_window_strategy() -> impl Strategy<Value = (i64, i64)> {
    (1i64..10_000i64, 0i64..10_000i64).prop_map(|(start, span)| (start, start + span))
}

/// Strategy for payment kinds
pub fn payment_kind_strategy() -> impl Strategy<Value = PaymentKind> {
    prop_oneof![
        Just(PaymentKind::Advance),
        Just(PaymentKind::Receipt),
        Just(PaymentKind::Payment),
    ]
}

/// Strategy for payment modes
pub fn payment_mode_strategy() -> impl Strategy<Value = PaymentMode> {
    prop_oneof![
        Just(PaymentMode::Cash),
        Just(PaymentMode::Cheque),
        Just(PaymentMode::Neft),
        Just(PaymentMode::Rtgs),
        Just(PaymentMode::Upi),
    ]
}
