//! In-Memory Store Adapters
//!
//! Hermetic implementations of the domain storage ports, backed by plain
//! mutex-guarded maps. They honor the same compare-and-swap contracts as
//! the Postgres adapters, so concurrency tests exercise the real retry
//! paths without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use core_kernel::{Money, PaymentId, PortError};
use domain_ledger::{DocumentRef, DocumentSnapshot, LedgerFields, LedgerStore};
use domain_numbering::{SequenceCounter, SequenceKey, SequenceStore};

fn guard<'a, T>(mutex: &'a Mutex<T>, what: &'static str) -> Result<MutexGuard<'a, T>, PortError> {
    mutex
        .lock()
        .map_err(|_| PortError::internal(format!("{what} lock poisoned")))
}

/// In-memory sequence counter store
#[derive(Default)]
pub struct InMemorySequenceStore {
    counters: Mutex<HashMap<SequenceKey, SequenceCounter>>,
}

impl InMemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    async fn find(&self, key: SequenceKey) -> Result<Option<SequenceCounter>, PortError> {
        Ok(guard(&self.counters, "counter store")?.get(&key).copied())
    }

    async fn insert(&self, counter: &SequenceCounter) -> Result<bool, PortError> {
        let mut counters = guard(&self.counters, "counter store")?;
        if counters.contains_key(&counter.key) {
            return Ok(false);
        }
        counters.insert(counter.key, *counter);
        Ok(true)
    }

    async fn compare_and_advance(
        &self,
        key: SequenceKey,
        expected: i64,
        new: i64,
    ) -> Result<bool, PortError> {
        let mut counters = guard(&self.counters, "counter store")?;
        match counters.get_mut(&key) {
            Some(counter) if counter.next == expected => {
                counter.next = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn save_config(&self, counter: &SequenceCounter) -> Result<(), PortError> {
        guard(&self.counters, "counter store")?.insert(counter.key, *counter);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SequenceCounter>, PortError> {
        let counters = guard(&self.counters, "counter store")?;
        let mut all: Vec<_> = counters.values().copied().collect();
        all.sort_by_key(|c| c.key.as_str());
        Ok(all)
    }
}

/// A payment row as the ledger store sees it: an amount linked (or not)
/// to a chargeable document
#[derive(Debug, Clone, Copy)]
struct PaymentRow {
    amount: Money,
    target: Option<DocumentRef>,
}

/// In-memory ledger store over documents and their linked payments
#[derive(Default)]
pub struct InMemoryLedgerStore {
    documents: Mutex<HashMap<DocumentRef, LedgerFields>>,
    payments: Mutex<HashMap<PaymentId, PaymentRow>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document with its stored ledger fields
    pub fn insert_document(&self, document: DocumentRef, fields: LedgerFields) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(document, fields);
        }
    }

    /// Removes a document, simulating a concurrent delete
    pub fn remove_document(&self, document: DocumentRef) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.remove(&document);
        }
    }

    /// Creates or updates a payment row
    pub fn upsert_payment(&self, id: PaymentId, amount: Money, target: Option<DocumentRef>) {
        if let Ok(mut payments) = self.payments.lock() {
            payments.insert(id, PaymentRow { amount, target });
        }
    }

    /// Deletes a payment row
    pub fn remove_payment(&self, id: PaymentId) {
        if let Ok(mut payments) = self.payments.lock() {
            payments.remove(&id);
        }
    }

    /// Reads a document's stored fields, for assertions
    pub fn fields(&self, document: DocumentRef) -> Option<LedgerFields> {
        self.documents
            .lock()
            .ok()
            .and_then(|documents| documents.get(&document).copied())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn snapshot(&self, document: DocumentRef) -> Result<Option<DocumentSnapshot>, PortError> {
        let fields = match guard(&self.documents, "document store")?.get(&document) {
            Some(fields) => *fields,
            None => return Ok(None),
        };

        let payments = guard(&self.payments, "payment store")?;
        let linked = payments
            .values()
            .filter(|row| row.target == Some(document))
            .map(|row| &row.amount);
        let settled = Money::try_sum(fields.total_charges.currency(), linked)
            .map_err(|e| PortError::internal(format!("settlement sum failed: {e}")))?;

        Ok(Some(DocumentSnapshot { fields, settled }))
    }

    async fn commit(
        &self,
        document: DocumentRef,
        fields: &LedgerFields,
        expected_paid: Money,
    ) -> Result<bool, PortError> {
        let mut documents = guard(&self.documents, "document store")?;
        match documents.get_mut(&document) {
            Some(stored) if stored.paid_amount == expected_paid => {
                *stored = *fields;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
