//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than standard assertions.

use core_kernel::Money;
use domain_ledger::{LedgerFields, SettlementStatus};
use rust_decimal::Decimal;

/// Asserts that a Money value equals an expected decimal amount
///
/// # Panics
///
/// Panics with both values when they differ.
pub fn assert_amount_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Amount mismatch: actual={}, expected={}",
        actual.amount(),
        expected
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts a full set of derived ledger fields in one shot
///
/// # Panics
///
/// Panics naming the first field that differs.
pub fn assert_ledger_fields(
    fields: &LedgerFields,
    total: Decimal,
    paid: Decimal,
    balance: Decimal,
    status: SettlementStatus,
) {
    assert_eq!(
        fields.total_charges.amount(),
        total,
        "total_charges mismatch: actual={}, expected={}",
        fields.total_charges.amount(),
        total
    );
    assert_eq!(
        fields.paid_amount.amount(),
        paid,
        "paid_amount mismatch: actual={}, expected={}",
        fields.paid_amount.amount(),
        paid
    );
    assert_eq!(
        fields.balance_payable.amount(),
        balance,
        "balance_payable mismatch: actual={}, expected={}",
        fields.balance_payable.amount(),
        balance
    );
    assert_eq!(
        fields.status, status,
        "status mismatch: actual={}, expected={}",
        fields.status, status
    );
}
