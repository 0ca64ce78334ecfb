//! Ledger Domain - Charge Totals and Payment Reconciliation
//!
//! Every chargeable document (invoice, truck hiring note, lorry receipt)
//! stores derived money fields alongside its source fields: total charges,
//! paid amount, balance payable, and a settlement status. This crate owns
//! the rules that keep those fields consistent:
//!
//! - **Charge calculation**: total charges is always the sum of the
//!   document's itemized charge components; balance payable is total minus
//!   advance minus ledger settlements. Derived fields are recomputed before
//!   every persist, never hand-set.
//! - **Reconciliation**: when a payment is created, retargeted, or deleted,
//!   every affected document's paid amount is re-summed from its current
//!   set of linked payments. Summing the current set (rather than applying
//!   deltas) makes reconciliation idempotent: a replayed event cannot
//!   double-count.
//!
//! # Example
//!
//! ```rust,ignore
//! let fields = LedgerFields::derive(&charges, advance, settled)?;
//! reconciler.on_payment_change(&change).await?;
//! ```

pub mod charges;
pub mod error;
pub mod fields;
pub mod payment;
pub mod reconciler;
pub mod status;

pub use charges::{compute_totals, ChargeBreakdown, ChargeLine, ChargeTotals};
pub use error::LedgerError;
pub use fields::LedgerFields;
pub use payment::{DocumentRef, Payment, PaymentChange, PaymentKind, PaymentMode, PaymentOperation};
pub use reconciler::{DocumentSnapshot, LedgerReconciler, LedgerStore, MAX_COMMIT_RETRIES};
pub use status::SettlementStatus;
