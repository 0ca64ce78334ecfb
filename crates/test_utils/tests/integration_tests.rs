//! Integration Tests for Open Freight Core
//!
//! These tests verify cross-domain workflows and end-to-end scenarios
//! that involve multiple crates working together.

use chrono::NaiveDate;
use core_kernel::{Currency, CustomerId, Money, VehicleId};
use rust_decimal_macros::dec;

mod billing_workflow {
    use super::*;
    use core_kernel::Rate;
    use domain_freight::{GstType, Invoice, LorryReceipt, LorryReceiptCharges, LorryReceiptStatus};
    use domain_ledger::{LedgerFields, SettlementStatus};

    fn delivered_receipt(lr_number: i64, freight: Money) -> LorryReceipt {
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
        .expect("valid receipt");

        let mut charges = LorryReceiptCharges::zero(Currency::INR);
        charges.freight = freight;
        receipt.set_charges(charges).expect("valid charges");
        receipt
            .mark_delivered(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap())
            .expect("forward transition");
        receipt
    }

    /// Receipts are carried, delivered, then billed through an invoice
    /// whose settlement fields start from the GST-inclusive grand total
    #[test]
    fn test_receipts_to_invoice_workflow() {
        let receipts = vec![
            delivered_receipt(101, Money::new(dec!(6000), Currency::INR)),
            delivered_receipt(102, Money::new(dec!(4000), Currency::INR)),
        ];

        let mut invoice = Invoice::new(
            42,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            CustomerId::new(),
            Currency::INR,
        );
        invoice.gst_type = GstType::Igst;
        invoice.igst_rate = Rate::from_percentage(dec!(12));
        invoice.cover_lorry_receipts(&receipts).expect("covered");

        assert_eq!(invoice.total_amount.amount(), dec!(10000));
        assert_eq!(invoice.grand_total.amount(), dec!(11200));

        invoice.ledger = LedgerFields::derive(
            &invoice.charge_breakdown(),
            Money::zero(Currency::INR),
            Money::zero(Currency::INR),
        )
        .expect("derivable");

        assert_eq!(invoice.ledger.total_charges.amount(), dec!(11200));
        assert_eq!(invoice.ledger.balance_payable.amount(), dec!(11200));
        assert_eq!(invoice.ledger.status, SettlementStatus::Unpaid);

        for mut receipt in receipts {
            receipt
                .transition_to(LorryReceiptStatus::Invoiced)
                .expect("delivered receipts can be invoiced");
        }
    }
}

mod settlement_workflow {
    use super::*;
    use domain_ledger::{DocumentRef, LedgerReconciler, PaymentChange, SettlementStatus};
    use std::sync::Arc;
    use test_utils::{
        assert_ledger_fields, sample_truck_hiring_note, InMemoryLedgerStore, TestPaymentBuilder,
    };

    /// A hiring note is issued with an advance, then settled through two
    /// ledger payments; each mutation reconciles the derived fields
    #[tokio::test]
    async fn test_thn_settlement_workflow() {
        let note = sample_truck_hiring_note(7).expect("valid note");
        let target = DocumentRef::TruckHiringNote(note.id);

        // charges 1000 + 200 + 50, advance 300
        assert_ledger_fields(
            &note.ledger,
            dec!(1250),
            dec!(300),
            dec!(950),
            SettlementStatus::PartiallyPaid,
        );

        let store = Arc::new(InMemoryLedgerStore::new());
        store.insert_document(target, note.ledger);
        let reconciler = LedgerReconciler::new(Arc::clone(&store));

        // First settlement payment
        let payment = TestPaymentBuilder::new()
            .with_amount(Money::new(dec!(500), Currency::INR))
            .with_target(target)
            .build();
        store.upsert_payment(payment.id, payment.amount, payment.target);
        reconciler
            .on_payment_change(&PaymentChange::created(payment.target))
            .await
            .expect("reconciled");

        let fields = store.fields(target).expect("document exists");
        assert_ledger_fields(
            &fields,
            dec!(1250),
            dec!(800),
            dec!(450),
            SettlementStatus::PartiallyPaid,
        );

        // Final settlement payment clears the balance
        let final_payment = TestPaymentBuilder::new()
            .with_amount(Money::new(dec!(450), Currency::INR))
            .with_target(target)
            .build();
        store.upsert_payment(final_payment.id, final_payment.amount, final_payment.target);
        reconciler
            .on_payment_change(&PaymentChange::created(final_payment.target))
            .await
            .expect("reconciled");

        let fields = store.fields(target).expect("document exists");
        assert_ledger_fields(&fields, dec!(1250), dec!(1250), dec!(0), SettlementStatus::Paid);
    }
}

mod numbering_workflow {
    use super::*;
    use domain_numbering::{SequenceAllocator, SequenceKey};
    use std::sync::Arc;
    use test_utils::InMemorySequenceStore;

    /// Documents of different types draw from independent sequences, and
    /// an administrator can re-window a sequence mid-stream
    #[tokio::test]
    async fn test_numbering_administration_workflow() {
        let allocator = Arc::new(SequenceAllocator::new(InMemorySequenceStore::new()));

        let lr = allocator.allocate(SequenceKey::LorryReceipt).await.unwrap();
        let invoice = allocator.allocate(SequenceKey::Invoice).await.unwrap();
        assert_eq!(lr, 1);
        assert_eq!(invoice, 1);

        // New financial year: invoices restart in a fresh window
        allocator
            .configure(SequenceKey::Invoice, 2501, 9999, false)
            .await
            .unwrap();
        let invoice = allocator.allocate(SequenceKey::Invoice).await.unwrap();
        assert_eq!(invoice, 2501);

        // Lorry receipt numbering is unaffected
        let lr = allocator.allocate(SequenceKey::LorryReceipt).await.unwrap();
        assert_eq!(lr, 2);
    }
}
