//! Sequence counter records and pure range logic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NumberingError;

/// Default window for a counter created implicitly on first use.
///
/// Operators normally configure the legal number window up front; when they
/// have not, the first allocation creates the counter with this 7-digit
/// closed range.
pub const DEFAULT_RANGE_START: i64 = 1;
pub const DEFAULT_RANGE_END: i64 = 9_999_999;

/// A logical numbering domain, one monotonic counter per document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceKey {
    #[serde(rename = "lorryReceiptId")]
    LorryReceipt,
    #[serde(rename = "invoiceId")]
    Invoice,
    #[serde(rename = "truckHiringNoteId")]
    TruckHiringNote,
}

impl SequenceKey {
    /// Returns the stored key string for this numbering domain
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceKey::LorryReceipt => "lorryReceiptId",
            SequenceKey::Invoice => "invoiceId",
            SequenceKey::TruckHiringNote => "truckHiringNoteId",
        }
    }

    /// All numbering domains, in document-type order
    pub fn all() -> [SequenceKey; 3] {
        [
            SequenceKey::LorryReceipt,
            SequenceKey::Invoice,
            SequenceKey::TruckHiringNote,
        ]
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SequenceKey {
    type Err = NumberingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lorryReceiptId" => Ok(SequenceKey::LorryReceipt),
            "invoiceId" => Ok(SequenceKey::Invoice),
            "truckHiringNoteId" => Ok(SequenceKey::TruckHiringNote),
            other => Err(NumberingError::UnknownKey(other.to_string())),
        }
    }
}

/// A durable counter for one numbering domain
///
/// # Invariants
///
/// - `range_start <= range_end`
/// - `next` is the smallest integer not yet issued for this key
/// - `next` is advanced only through the allocator's compare-and-swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    /// The numbering domain this counter serves
    pub key: SequenceKey,
    /// Inclusive lower bound of the legal number window
    pub range_start: i64,
    /// Inclusive upper bound of the legal number window
    pub range_end: i64,
    /// The integer issued by the next allocation
    pub next: i64,
    /// If true, allocation may continue past `range_end`
    pub allow_outside_range: bool,
}

impl SequenceCounter {
    /// Creates a counter with an operator-configured window
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `range_start > range_end`.
    pub fn new(
        key: SequenceKey,
        range_start: i64,
        range_end: i64,
        allow_outside_range: bool,
    ) -> Result<Self, NumberingError> {
        if range_start > range_end {
            return Err(NumberingError::InvalidConfiguration {
                start: range_start,
                end: range_end,
            });
        }
        Ok(Self {
            key,
            range_start,
            range_end,
            next: range_start,
            allow_outside_range,
        })
    }

    /// Creates a counter with the implicit default window, used when a
    /// document is created before any operator configuration exists
    pub fn with_default_range(key: SequenceKey) -> Self {
        Self {
            key,
            range_start: DEFAULT_RANGE_START,
            range_end: DEFAULT_RANGE_END,
            next: DEFAULT_RANGE_START,
            allow_outside_range: false,
        }
    }

    /// Returns the value the next allocation would issue, without advancing
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` when the candidate exceeds the ceiling and
    /// overflow past the window is disallowed. The counter is untouched.
    pub fn candidate(&self) -> Result<i64, NumberingError> {
        if self.next > self.range_end && !self.allow_outside_range {
            return Err(NumberingError::OutOfRange {
                key: self.key,
                ceiling: self.range_end,
            });
        }
        Ok(self.next)
    }

    /// Applies a new window to an existing counter
    ///
    /// A `next` that falls inside the new window is preserved; one that
    /// falls outside it is pulled back to `range_start`. Operators shrinking
    /// a window below numbers already issued accept re-issuance from the new
    /// floor; the usual administrative move is widening an exhausted window,
    /// which keeps `next` where it was.
    pub fn reconfigure(
        &mut self,
        range_start: i64,
        range_end: i64,
        allow_outside_range: bool,
    ) -> Result<(), NumberingError> {
        if range_start > range_end {
            return Err(NumberingError::InvalidConfiguration {
                start: range_start,
                end: range_end,
            });
        }
        self.range_start = range_start;
        self.range_end = range_end;
        self.allow_outside_range = allow_outside_range;
        if self.next < range_start || self.next > range_end {
            self.next = range_start;
        }
        Ok(())
    }
}
