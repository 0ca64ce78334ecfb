//! Payment-ledger reconciliation
//!
//! The reconciler owns the invariant that a document's `paid_amount` equals
//! its advance plus the sum of its currently linked settlement payments.
//! It re-derives that sum on every pass instead of applying deltas, so a
//! replayed or duplicated change event converges to the same stored state.

use async_trait::async_trait;
use tracing::{debug, warn};

use core_kernel::{Money, PortError};

use crate::charges::ChargeBreakdown;
use crate::error::LedgerError;
use crate::fields::LedgerFields;
use crate::payment::{DocumentRef, PaymentChange};
use crate::status::SettlementStatus;

/// Commit attempts per document before giving up under contention
pub const MAX_COMMIT_RETRIES: u32 = 16;

/// A consistent read of a document's ledger state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Derived fields as currently stored on the document
    pub fields: LedgerFields,
    /// Fresh sum of the settlement payments linked to the document
    pub settled: Money,
}

/// Storage port for ledger reconciliation
///
/// `commit` is compare-and-swap on the stored `paid_amount`: concurrent
/// reconcilers of the same document serialize through it, and the loser
/// re-reads and recomputes rather than overwriting a newer sum.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Reads the document's stored fields together with the current sum of
    /// its linked settlement payments. `None` when the document does not
    /// exist.
    async fn snapshot(&self, document: DocumentRef) -> Result<Option<DocumentSnapshot>, PortError>;

    /// Persists recomputed fields if the stored `paid_amount` still equals
    /// `expected_paid`. Returns false when a concurrent writer got there
    /// first.
    async fn commit(
        &self,
        document: DocumentRef,
        fields: &LedgerFields,
        expected_paid: Money,
    ) -> Result<bool, PortError>;
}

#[async_trait]
impl<S: LedgerStore> LedgerStore for std::sync::Arc<S> {
    async fn snapshot(&self, document: DocumentRef) -> Result<Option<DocumentSnapshot>, PortError> {
        (**self).snapshot(document).await
    }

    async fn commit(
        &self,
        document: DocumentRef,
        fields: &LedgerFields,
        expected_paid: Money,
    ) -> Result<bool, PortError> {
        (**self).commit(document, fields, expected_paid).await
    }
}

/// Keeps derived ledger fields consistent with charge components and the
/// payment ledger
pub struct LedgerReconciler<S> {
    store: S,
}

impl<S> LedgerReconciler<S> {
    /// Creates a reconciler over the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Computes the full set of derived fields for a document about to be
    /// created or updated
    ///
    /// Pass `settled = 0` on creation; on update, pass the current sum of
    /// the document's linked payments so edits to charges keep the balance
    /// honest.
    ///
    /// # Errors
    ///
    /// Returns `NegativeCharge` for any negative component and
    /// `AdvanceExceedsTotal` when the advance alone is more than the fresh
    /// total. Settled payments above the total are not an error; the
    /// status clamps to Paid instead.
    pub fn on_document_upsert(
        charges: &ChargeBreakdown,
        advance_paid: Money,
        settled: Money,
    ) -> Result<LedgerFields, LedgerError> {
        LedgerFields::derive(charges, advance_paid, settled)
    }

    /// Recomputes derived fields from a snapshot, keeping the stored
    /// charges and advance as-is
    fn recompute(snapshot: &DocumentSnapshot) -> Result<LedgerFields, LedgerError> {
        let prior = snapshot.fields;
        let paid_amount = prior.advance_paid.checked_add(&snapshot.settled)?;
        let balance_payable = prior.total_charges.checked_sub(&paid_amount)?;
        let status = SettlementStatus::derive(paid_amount, prior.total_charges);
        Ok(LedgerFields {
            total_charges: prior.total_charges,
            advance_paid: prior.advance_paid,
            paid_amount,
            balance_payable,
            status,
        })
    }
}

impl<S: LedgerStore> LedgerReconciler<S> {
    /// Reconciles every document a persisted payment mutation touched
    ///
    /// Must be called after the payment write is durable. A retarget
    /// reconciles both the old and the new document.
    ///
    /// # Errors
    ///
    /// Returns `Contention` if a document's commit keeps losing races past
    /// the retry budget; storage failures propagate as `Store`.
    pub async fn on_payment_change(&self, change: &PaymentChange) -> Result<(), LedgerError> {
        for document in change.affected_documents() {
            self.reconcile_document(document).await?;
        }
        Ok(())
    }

    /// Re-sums one document's linked payments and persists the derived
    /// fields
    ///
    /// A missing document is not an error: the payment may point at a
    /// document deleted since the payment was recorded, and the orphaned
    /// reference is left for reporting to surface.
    pub async fn reconcile_document(&self, document: DocumentRef) -> Result<(), LedgerError> {
        for attempt in 0..MAX_COMMIT_RETRIES {
            let Some(snapshot) = self.store.snapshot(document).await? else {
                warn!(%document, "reconciliation target not found, skipping");
                return Ok(());
            };

            let fields = Self::recompute(&snapshot)?;
            if fields == snapshot.fields {
                return Ok(());
            }

            if self
                .store
                .commit(document, &fields, snapshot.fields.paid_amount)
                .await?
            {
                debug!(
                    %document,
                    paid = %fields.paid_amount,
                    status = %fields.status,
                    "ledger fields reconciled"
                );
                return Ok(());
            }

            debug!(%document, attempt, "lost reconciliation commit race, re-reading");
        }
        Err(LedgerError::Contention { document })
    }

    /// Re-derives and commits a document's fields after its charges or
    /// advance were edited
    ///
    /// The settled sum is re-read from storage on every attempt and the
    /// commit is conditional on the stored `paid_amount`, so an edit can
    /// never roll back a settlement that landed after the caller loaded
    /// the document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentMissing` when the document was deleted underneath
    /// the edit, the derivation's validation errors, and `Contention` on
    /// retry-budget exhaustion.
    pub async fn on_document_edit(
        &self,
        document: DocumentRef,
        charges: &ChargeBreakdown,
        advance_paid: Money,
    ) -> Result<LedgerFields, LedgerError> {
        for attempt in 0..MAX_COMMIT_RETRIES {
            let Some(snapshot) = self.store.snapshot(document).await? else {
                return Err(LedgerError::DocumentMissing { document });
            };

            let fields = LedgerFields::derive(charges, advance_paid, snapshot.settled)?;
            if fields == snapshot.fields {
                return Ok(fields);
            }

            if self
                .store
                .commit(document, &fields, snapshot.fields.paid_amount)
                .await?
            {
                debug!(
                    %document,
                    total = %fields.total_charges,
                    paid = %fields.paid_amount,
                    "ledger fields re-derived for edited document"
                );
                return Ok(fields);
            }

            debug!(%document, attempt, "lost edit commit race, re-reading");
        }
        Err(LedgerError::Contention { document })
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

    fn sample_charges() -> ChargeBreakdown {
        ChargeBreakdown::new(Currency::INR)
            .line("freight", inr(dec!(1000)))
            .line("fuelCharges", inr(dec!(200)))
            .line("tollCharges", inr(dec!(50)))
            .line("otherCharges", inr(dec!(0)))
    }

    #[test]
    fn test_upsert_derives_all_fields() {
        let fields = LedgerReconciler::<()>::on_document_upsert(
            &sample_charges(),
            inr(dec!(300)),
            Money::zero(Currency::INR),
        )
        .unwrap();

        assert_eq!(fields.total_charges.amount(), dec!(1250));
        assert_eq!(fields.advance_paid.amount(), dec!(300));
        assert_eq!(fields.paid_amount.amount(), dec!(300));
        assert_eq!(fields.balance_payable.amount(), dec!(950));
        assert_eq!(fields.status, SettlementStatus::PartiallyPaid);
    }

    #[test]
    fn test_upsert_rejects_advance_over_total() {
        let err = LedgerReconciler::<()>::on_document_upsert(
            &sample_charges(),
            inr(dec!(1300)),
            Money::zero(Currency::INR),
        )
        .unwrap_err();

        match err {
            LedgerError::AdvanceExceedsTotal { advance, total } => {
                assert_eq!(advance.amount(), dec!(1300));
                assert_eq!(total.amount(), dec!(1250));
            }
            other => panic!("expected AdvanceExceedsTotal, got {other}"),
        }
    }

    #[test]
    fn test_upsert_accepts_advance_equal_to_total() {
        let fields = LedgerReconciler::<()>::on_document_upsert(
            &sample_charges(),
            inr(dec!(1250)),
            Money::zero(Currency::INR),
        )
        .unwrap();

        assert_eq!(fields.status, SettlementStatus::Paid);
        assert!(fields.balance_payable.is_zero());
    }

    #[test]
    fn test_upsert_over_settlement_clamps_status() {
        // Ledger payments above the balance are allowed; only the advance
        // is validated against the total.
        let fields = LedgerReconciler::<()>::on_document_upsert(
            &sample_charges(),
            inr(dec!(100)),
            inr(dec!(2000)),
        )
        .unwrap();

        assert_eq!(fields.status, SettlementStatus::Paid);
        assert_eq!(fields.balance_payable.amount(), dec!(-850));
    }

    #[test]
    fn test_recompute_keeps_charges_and_advance() {
        let stored = LedgerReconciler::<()>::on_document_upsert(
            &sample_charges(),
            inr(dec!(300)),
            Money::zero(Currency::INR),
        )
        .unwrap();

        let snapshot = DocumentSnapshot {
            fields: stored,
            settled: inr(dec!(950)),
        };
        let fields = LedgerReconciler::<()>::recompute(&snapshot).unwrap();

        assert_eq!(fields.total_charges, stored.total_charges);
        assert_eq!(fields.advance_paid, stored.advance_paid);
        assert_eq!(fields.paid_amount.amount(), dec!(1250));
        assert!(fields.balance_payable.is_zero());
        assert_eq!(fields.status, SettlementStatus::Paid);
    }
}
