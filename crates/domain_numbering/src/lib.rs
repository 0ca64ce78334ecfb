//! Numbering Domain - Sequential Document Numbers
//!
//! Every lorry receipt, invoice, and truck hiring note carries a legally
//! significant sequential number. This crate owns the counters behind those
//! numbers and guarantees that no two allocations for the same key ever
//! return the same value, even under concurrent requests.
//!
//! # Design
//!
//! Counters are durable records mutated only through [`SequenceAllocator`].
//! The storage contract is a compare-and-swap on the stored `next` value:
//! the allocator reads the counter, range-checks the candidate, then
//! advances `next` only if nobody else advanced it first, retrying on
//! conflict. Different keys never serialize against each other.
//!
//! # Example
//!
//! ```rust,ignore
//! let allocator = SequenceAllocator::new(store);
//! let number = allocator.allocate(SequenceKey::Invoice).await?;
//! ```

pub mod allocator;
pub mod counter;
pub mod error;

pub use allocator::{SequenceAllocator, SequenceStore, MAX_CAS_RETRIES};
pub use counter::{SequenceCounter, SequenceKey, DEFAULT_RANGE_END, DEFAULT_RANGE_START};
pub use error::NumberingError;
