//! Numbering domain errors

use thiserror::Error;

use core_kernel::PortError;

use crate::counter::SequenceKey;

/// Errors that can occur in the numbering domain
#[derive(Debug, Error)]
pub enum NumberingError {
    /// Allocation would exceed the configured ceiling on a closed range
    #[error("Sequence '{key}' exhausted: next number would exceed ceiling {ceiling}")]
    OutOfRange { key: SequenceKey, ceiling: i64 },

    /// Malformed numbering-range configuration
    #[error("Invalid numbering configuration: start {start} exceeds end {end}")]
    InvalidConfiguration { start: i64, end: i64 },

    /// The key string does not name a known numbering domain
    #[error("Unknown numbering key: {0}")]
    UnknownKey(String),

    /// The compare-and-swap retry budget was exhausted under contention
    #[error("Sequence '{key}' allocation retries exhausted under contention")]
    Contention { key: SequenceKey },

    /// Storage failure
    #[error("Numbering store error: {0}")]
    Store(#[from] PortError),
}

impl NumberingError {
    /// Returns true if the caller supplied bad input (as opposed to an
    /// infrastructure failure)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NumberingError::OutOfRange { .. }
                | NumberingError::InvalidConfiguration { .. }
                | NumberingError::UnknownKey(_)
        )
    }
}
