//! Unit tests for the Money module
//!
//! Tests cover money creation, arithmetic operations, summation,
//! rate application, and edge cases.

use core_kernel::{Currency, Money, MoneyError, Rate};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::INR);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::INR);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::INR);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_paise_correctly() {
        let m = Money::from_minor(10050, Currency::INR);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_inr_shorthand() {
        let m = Money::inr(dec!(1250));
        assert_eq!(m.currency(), Currency::INR);
        assert_eq!(m.amount(), dec!(1250));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::USD);
        assert!(m.is_zero());
        assert_eq!(m.currency(), Currency::USD);
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_is_zero_true_for_zero_amount() {
        assert!(Money::zero(Currency::INR).is_zero());
    }

    #[test]
    fn test_is_positive_false_for_zero() {
        assert!(!Money::zero(Currency::INR).is_positive());
    }

    #[test]
    fn test_is_negative_false_for_zero() {
        assert!(!Money::zero(Currency::INR).is_negative());
    }

    #[test]
    fn test_abs_of_negative() {
        let m = Money::inr(dec!(-42.50));
        assert_eq!(m.abs().amount(), dec!(42.50));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::inr(dec!(1000));
        let b = Money::inr(dec!(250.25));
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.amount(), dec!(1250.25));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Money::inr(dec!(1000));
        let b = Money::new(dec!(100), Currency::USD);
        assert!(matches!(
            a.checked_add(&b),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn test_checked_sub_goes_negative() {
        let a = Money::inr(dec!(100));
        let b = Money::inr(dec!(150));
        let diff = a.checked_sub(&b).unwrap();
        assert!(diff.is_negative());
        assert_eq!(diff.amount(), dec!(-50));
    }

    #[test]
    fn test_neg_flips_sign() {
        let m = -Money::inr(dec!(10));
        assert_eq!(m.amount(), dec!(-10));
    }

    #[test]
    fn test_try_sum_empty_is_zero() {
        let total = Money::try_sum(Currency::INR, &[]).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn test_try_sum_charge_components() {
        let lines = vec![
            Money::inr(dec!(1000)),
            Money::inr(dec!(200)),
            Money::inr(dec!(50)),
            Money::inr(dec!(0)),
        ];
        let total = Money::try_sum(Currency::INR, &lines).unwrap();
        assert_eq!(total.amount(), dec!(1250));
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_rate_from_percentage() {
        let rate = Rate::from_percentage(dec!(18));
        assert_eq!(rate.as_decimal(), dec!(0.18));
        assert_eq!(rate.as_percentage(), dec!(18));
    }

    #[test]
    fn test_rate_apply_gst_split() {
        // CGST 9% + SGST 9% on a freight total
        let freight = Money::inr(dec!(12500));
        let cgst = Rate::from_percentage(dec!(9)).apply(&freight);
        let sgst = Rate::from_percentage(dec!(9)).apply(&freight);
        assert_eq!(cgst.amount(), dec!(1125));
        assert_eq!(sgst.amount(), dec!(1125));
    }

    #[test]
    fn test_zero_rate() {
        let rate = Rate::zero();
        let applied = rate.apply(&Money::inr(dec!(1000)));
        assert!(applied.is_zero());
    }
}

mod display {
    use super::*;

    #[test]
    fn test_inr_display_uses_symbol() {
        let m = Money::inr(dec!(1250.5));
        assert_eq!(m.to_string(), "₹ 1250.50");
    }

    #[test]
    fn test_round_to_currency() {
        let m = Money::inr(dec!(99.999));
        // 4dp internal, 2dp for display/storage
        assert_eq!(m.round_to_currency().amount(), dec!(100.00));
    }
}
