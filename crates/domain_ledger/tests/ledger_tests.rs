//! Ledger reconciliation integration tests
//!
//! Exercise the reconciler against the in-memory ledger store: payment
//! create/retarget/delete flows, idempotency, and the orphaned-target
//! no-op.

use std::sync::Arc;

use core_kernel::{Currency, InvoiceId, Money, PaymentId, TruckHiringNoteId};
use domain_ledger::{
    ChargeBreakdown, DocumentRef, LedgerFields, LedgerReconciler, PaymentChange,
    SettlementStatus,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::{assert_ledger_fields, InMemoryLedgerStore};

fn inr(amount: Decimal) -> Money {
    Money::new(amount, Currency::INR)
}

fn freight_charges(amount: Decimal) -> ChargeBreakdown {
    ChargeBreakdown::new(Currency::INR).line("freight", inr(amount))
}

/// Seeds a document with the given total charges and no payments
fn seed_document(store: &InMemoryLedgerStore, total: Decimal) -> DocumentRef {
    let document = DocumentRef::Invoice(InvoiceId::new());
    let fields = LedgerFields::derive(&freight_charges(total), inr(dec!(0)), inr(dec!(0)))
        .expect("valid seed fields");
    store.insert_document(document, fields);
    document
}

fn reconciler(store: &Arc<InMemoryLedgerStore>) -> LedgerReconciler<Arc<InMemoryLedgerStore>> {
    LedgerReconciler::new(Arc::clone(store))
}

mod payment_lifecycle {
    use super::*;

    #[tokio::test]
    async fn created_payment_settles_its_target() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(400)), Some(document));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();

        let fields = store.fields(document).unwrap();
        assert_ledger_fields(
            &fields,
            dec!(1000),
            dec!(400),
            dec!(600),
            SettlementStatus::PartiallyPaid,
        );
    }

    #[tokio::test]
    async fn full_settlement_marks_paid() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(1000)), Some(document));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();

        let fields = store.fields(document).unwrap();
        assert_ledger_fields(&fields, dec!(1000), dec!(1000), dec!(0), SettlementStatus::Paid);
    }

    #[tokio::test]
    async fn deleted_payment_reverts_settlement() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        let payment_id = PaymentId::new();
        store.upsert_payment(payment_id, inr(dec!(1000)), Some(document));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();

        store.remove_payment(payment_id);
        reconciler
            .on_payment_change(&PaymentChange::deleted(Some(document)))
            .await
            .unwrap();

        let fields = store.fields(document).unwrap();
        assert_ledger_fields(&fields, dec!(1000), dec!(0), dec!(1000), SettlementStatus::Unpaid);
    }

    #[tokio::test]
    async fn unlinked_payment_touches_nothing() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let before = store.fields(document).unwrap();
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(400)), None);
        reconciler
            .on_payment_change(&PaymentChange::created(None))
            .await
            .unwrap();

        assert_eq!(store.fields(document).unwrap(), before);
    }

    #[tokio::test]
    async fn over_settlement_clamps_to_paid() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(1500)), Some(document));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();

        let fields = store.fields(document).unwrap();
        assert_eq!(fields.status, SettlementStatus::Paid);
        assert_eq!(fields.balance_payable.amount(), dec!(-500));
    }
}

mod idempotency {
    use super::*;

    #[tokio::test]
    async fn replayed_change_does_not_double_count() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(400)), Some(document));
        let change = PaymentChange::created(Some(document));

        reconciler.on_payment_change(&change).await.unwrap();
        let after_first = store.fields(document).unwrap();

        // Replay of the same durable state converges, never accumulates
        reconciler.on_payment_change(&change).await.unwrap();
        let after_second = store.fields(document).unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(after_second.paid_amount.amount(), dec!(400));
    }
}

mod retargeting {
    use super::*;

    #[tokio::test]
    async fn moving_a_payment_rebalances_both_documents() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document_a = seed_document(&store, dec!(1000));
        let document_b = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        // Fully settle A with two payments, one of which will move
        let moving = PaymentId::new();
        store.upsert_payment(PaymentId::new(), inr(dec!(500)), Some(document_a));
        store.upsert_payment(moving, inr(dec!(500)), Some(document_a));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document_a)))
            .await
            .unwrap();
        assert_eq!(
            store.fields(document_a).unwrap().status,
            SettlementStatus::Paid
        );

        // Retarget the second payment to B
        store.upsert_payment(moving, inr(dec!(500)), Some(document_b));
        reconciler
            .on_payment_change(&PaymentChange::updated(Some(document_a), Some(document_b)))
            .await
            .unwrap();

        let fields_a = store.fields(document_a).unwrap();
        assert_ledger_fields(
            &fields_a,
            dec!(1000),
            dec!(500),
            dec!(500),
            SettlementStatus::PartiallyPaid,
        );

        let fields_b = store.fields(document_b).unwrap();
        assert_ledger_fields(
            &fields_b,
            dec!(1000),
            dec!(500),
            dec!(500),
            SettlementStatus::PartiallyPaid,
        );
    }

    #[tokio::test]
    async fn retarget_across_document_types() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let invoice = seed_document(&store, dec!(800));
        let thn = DocumentRef::TruckHiringNote(TruckHiringNoteId::new());
        let thn_fields =
            LedgerFields::derive(&freight_charges(dec!(800)), inr(dec!(0)), inr(dec!(0))).unwrap();
        store.insert_document(thn, thn_fields);
        let reconciler = reconciler(&store);

        let payment_id = PaymentId::new();
        store.upsert_payment(payment_id, inr(dec!(800)), Some(invoice));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(invoice)))
            .await
            .unwrap();

        store.upsert_payment(payment_id, inr(dec!(800)), Some(thn));
        reconciler
            .on_payment_change(&PaymentChange::updated(Some(invoice), Some(thn)))
            .await
            .unwrap();

        assert_eq!(
            store.fields(invoice).unwrap().status,
            SettlementStatus::Unpaid
        );
        assert_eq!(store.fields(thn).unwrap().status, SettlementStatus::Paid);
    }
}

mod orphaned_targets {
    use super::*;

    #[tokio::test]
    async fn missing_document_is_a_no_op() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let reconciler = reconciler(&store);

        let ghost = DocumentRef::Invoice(InvoiceId::new());
        store.upsert_payment(PaymentId::new(), inr(dec!(400)), Some(ghost));

        // Reconciling a payment whose target was deleted completes cleanly
        reconciler
            .on_payment_change(&PaymentChange::created(Some(ghost)))
            .await
            .unwrap();
        assert!(store.fields(ghost).is_none());
    }

    #[tokio::test]
    async fn document_deleted_between_payment_and_reconcile() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(400)), Some(document));
        store.remove_document(document);

        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();
    }
}

mod document_edits {
    use super::*;
    use domain_ledger::LedgerError;

    #[tokio::test]
    async fn edit_preserves_a_settlement_recorded_after_the_load() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1250));
        let reconciler = reconciler(&store);

        // The editor loaded the document while it was still unpaid; a
        // payment settles part of it before the edit commits.
        store.upsert_payment(PaymentId::new(), inr(dec!(500)), Some(document));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();

        let fields = reconciler
            .on_document_edit(document, &freight_charges(dec!(1250)), inr(dec!(0)))
            .await
            .unwrap();

        // The edit re-read the settled sum instead of writing back the
        // stale zero the editor had in hand
        assert_ledger_fields(
            &fields,
            dec!(1250),
            dec!(500),
            dec!(750),
            SettlementStatus::PartiallyPaid,
        );
        assert_eq!(store.fields(document).unwrap(), fields);
    }

    #[tokio::test]
    async fn charge_edit_rebuckets_status_against_settled_payments() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(1000)), Some(document));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();
        assert_eq!(store.fields(document).unwrap().status, SettlementStatus::Paid);

        // Raising the charges reopens the balance
        let fields = reconciler
            .on_document_edit(document, &freight_charges(dec!(1600)), inr(dec!(0)))
            .await
            .unwrap();
        assert_ledger_fields(
            &fields,
            dec!(1600),
            dec!(1000),
            dec!(600),
            SettlementStatus::PartiallyPaid,
        );

        // Lowering them below the settled sum clamps back to Paid
        let fields = reconciler
            .on_document_edit(document, &freight_charges(dec!(800)), inr(dec!(0)))
            .await
            .unwrap();
        assert_eq!(fields.status, SettlementStatus::Paid);
        assert_eq!(fields.balance_payable.amount(), dec!(-200));
    }

    #[tokio::test]
    async fn edit_validates_advance_against_the_new_total() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);
        let before = store.fields(document).unwrap();

        let result = reconciler
            .on_document_edit(document, &freight_charges(dec!(400)), inr(dec!(500)))
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::AdvanceExceedsTotal { .. })
        ));
        // The rejected edit never reached storage
        assert_eq!(store.fields(document).unwrap(), before);
    }

    #[tokio::test]
    async fn edit_of_a_deleted_document_is_reported() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = seed_document(&store, dec!(1000));
        let reconciler = reconciler(&store);

        store.remove_document(document);
        let result = reconciler
            .on_document_edit(document, &freight_charges(dec!(1000)), inr(dec!(0)))
            .await;
        assert!(matches!(result, Err(LedgerError::DocumentMissing { .. })));
    }
}

mod upsert_validation {
    use super::*;
    use domain_ledger::LedgerError;

    #[tokio::test]
    async fn advance_over_total_rejected_and_nothing_stored() {
        let store = Arc::new(InMemoryLedgerStore::new());

        let result = LedgerFields::derive(&freight_charges(dec!(1000)), inr(dec!(1200)), inr(dec!(0)));
        assert!(matches!(
            result,
            Err(LedgerError::AdvanceExceedsTotal { .. })
        ));

        // The failed upsert never reached storage
        assert!(store
            .fields(DocumentRef::Invoice(InvoiceId::new()))
            .is_none());
    }

    #[tokio::test]
    async fn advance_counts_toward_settlement() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let document = DocumentRef::TruckHiringNote(TruckHiringNoteId::new());
        let fields =
            LedgerFields::derive(&freight_charges(dec!(1000)), inr(dec!(300)), inr(dec!(0)))
                .unwrap();
        store.insert_document(document, fields);
        let reconciler = reconciler(&store);

        store.upsert_payment(PaymentId::new(), inr(dec!(700)), Some(document));
        reconciler
            .on_payment_change(&PaymentChange::created(Some(document)))
            .await
            .unwrap();

        let fields = store.fields(document).unwrap();
        assert_ledger_fields(&fields, dec!(1000), dec!(1000), dec!(0), SettlementStatus::Paid);
    }
}
