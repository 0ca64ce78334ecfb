//! Sequence allocation service
//!
//! The allocator is the only code path that advances a counter. Atomicity
//! rests on the store's compare-and-swap contract: `compare_and_advance`
//! succeeds only if the stored `next` still equals the value the allocator
//! read, so two racing allocations can never both claim the same number —
//! the loser re-reads and retries with the fresh counter state.

use async_trait::async_trait;
use tracing::{debug, warn};

use core_kernel::PortError;

use crate::counter::{SequenceCounter, SequenceKey};
use crate::error::NumberingError;

/// Retry budget for the allocation compare-and-swap loop.
///
/// Contention on a single office's counters is light; exhausting this
/// budget signals something pathological and surfaces as an error rather
/// than spinning unboundedly.
pub const MAX_CAS_RETRIES: u32 = 16;

/// Durable storage contract for sequence counters
///
/// Implementations must make `compare_and_advance` atomic with respect to
/// concurrent callers for the same key (single-statement conditional update,
/// row CAS, or equivalent). Different keys are independent and must not
/// serialize against each other.
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Loads the counter for a key, if configured
    async fn find(&self, key: SequenceKey) -> Result<Option<SequenceCounter>, PortError>;

    /// Creates a counter if absent. Returns false if another writer
    /// created it first (the caller should re-read).
    async fn insert(&self, counter: &SequenceCounter) -> Result<bool, PortError>;

    /// Advances `next` from `expected` to `new` atomically. Returns false
    /// if the stored `next` no longer equals `expected`.
    async fn compare_and_advance(
        &self,
        key: SequenceKey,
        expected: i64,
        new: i64,
    ) -> Result<bool, PortError>;

    /// Persists a reconfigured counter (bounds, flag, clamped next)
    async fn save_config(&self, counter: &SequenceCounter) -> Result<(), PortError>;

    /// Lists all configured counters
    async fn list_all(&self) -> Result<Vec<SequenceCounter>, PortError>;
}

#[async_trait]
impl<S: SequenceStore> SequenceStore for std::sync::Arc<S> {
    async fn find(&self, key: SequenceKey) -> Result<Option<SequenceCounter>, PortError> {
        (**self).find(key).await
    }

    async fn insert(&self, counter: &SequenceCounter) -> Result<bool, PortError> {
        (**self).insert(counter).await
    }

    async fn compare_and_advance(
        &self,
        key: SequenceKey,
        expected: i64,
        new: i64,
    ) -> Result<bool, PortError> {
        (**self).compare_and_advance(key, expected, new).await
    }

    async fn save_config(&self, counter: &SequenceCounter) -> Result<(), PortError> {
        (**self).save_config(counter).await
    }

    async fn list_all(&self) -> Result<Vec<SequenceCounter>, PortError> {
        (**self).list_all().await
    }
}

/// Issues collision-free sequential numbers per document type
pub struct SequenceAllocator<S> {
    store: S,
}

impl<S: SequenceStore> SequenceAllocator<S> {
    /// Creates an allocator over the given counter store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Allocates the next number for a key
    ///
    /// Atomically reads the counter's `next`, advances it by one, and
    /// returns the pre-increment value. Creates the counter with the
    /// default window on first use.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` when the window is exhausted and overflow is
    ///   disallowed; the counter is left unchanged and no number is consumed
    /// - `Contention` when the retry budget is exhausted
    pub async fn allocate(&self, key: SequenceKey) -> Result<i64, NumberingError> {
        for attempt in 0..MAX_CAS_RETRIES {
            let counter = match self.store.find(key).await? {
                Some(counter) => counter,
                None => {
                    let fresh = SequenceCounter::with_default_range(key);
                    if self.store.insert(&fresh).await? {
                        fresh
                    } else {
                        // Lost the creation race; re-read the winner's row
                        continue;
                    }
                }
            };

            let value = counter.candidate()?;
            if self
                .store
                .compare_and_advance(key, value, value + 1)
                .await?
            {
                debug!(key = %key, number = value, "allocated sequence number");
                return Ok(value);
            }

            debug!(key = %key, attempt, "sequence CAS lost, retrying");
        }

        warn!(key = %key, "sequence allocation retry budget exhausted");
        Err(NumberingError::Contention { key })
    }

    /// Creates or updates the number window for a key
    ///
    /// On an existing counter, `next` is clamped into the new window per
    /// [`SequenceCounter::reconfigure`]; on a fresh one, `next` starts at
    /// `range_start`.
    pub async fn configure(
        &self,
        key: SequenceKey,
        range_start: i64,
        range_end: i64,
        allow_outside_range: bool,
    ) -> Result<SequenceCounter, NumberingError> {
        // Validate bounds up front so a bad request never touches storage
        let fresh = SequenceCounter::new(key, range_start, range_end, allow_outside_range)?;

        match self.store.find(key).await? {
            Some(mut existing) => {
                existing.reconfigure(range_start, range_end, allow_outside_range)?;
                self.store.save_config(&existing).await?;
                Ok(existing)
            }
            None => {
                if self.store.insert(&fresh).await? {
                    Ok(fresh)
                } else {
                    // Raced an implicit first-use creation; apply the new
                    // window to whatever the winner wrote
                    let mut existing = self.store.find(key).await?.ok_or_else(|| {
                        PortError::internal("counter vanished during configure")
                    })?;
                    existing.reconfigure(range_start, range_end, allow_outside_range)?;
                    self.store.save_config(&existing).await?;
                    Ok(existing)
                }
            }
        }
    }

    /// Returns all configured counters for the administration screen
    pub async fn counters(&self) -> Result<Vec<SequenceCounter>, NumberingError> {
        Ok(self.store.list_all().await?)
    }
}
