//! Core Kernel - Foundational types and utilities for the freight office system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers for documents, parties, and payments
//! - Shared error and port abstractions

pub mod error;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use error::CoreError;
pub use identifiers::{
    CustomerId, InvoiceId, LorryReceiptId, PaymentId, TransporterId, TruckHiringNoteId, VehicleId,
};
pub use money::{Currency, Money, MoneyError, Rate};
pub use ports::{DomainPort, PortError};
