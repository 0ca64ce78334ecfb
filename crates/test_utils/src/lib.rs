//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! Open Freight Core test suite.
//!
//! # Modules
//!
//! - `memory`: In-memory store adapters implementing the domain ports
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;
pub mod memory;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use generators::*;
pub use memory::*;
