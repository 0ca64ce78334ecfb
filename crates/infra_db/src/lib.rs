//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the freight system, built on SQLx.
//!
//! # Architecture
//!
//! Two kinds of types live here:
//!
//! - **Port adapters** implement the storage contracts the domain crates
//!   define (`SequenceStore`, `LedgerStore`). Their atomicity guarantees
//!   rest on single-statement conditional updates, so the domain's
//!   compare-and-swap retry loops work unchanged against Postgres.
//! - **Repositories** provide plain CRUD for the freight documents and
//!   parties. Documents are stored as a JSONB payload plus indexed columns
//!   for the fields list screens filter on.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresSequenceStore};
//!
//! let pool = create_pool(DatabaseConfig::new(url)).await?;
//! infra_db::run_migrations(&pool).await?;
//! let sequences = PostgresSequenceStore::new(pool.clone());
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::{PostgresLedgerStore, PostgresSequenceStore};
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{
    CustomerRepository, InvoiceRepository, LorryReceiptRepository, PaymentRepository,
    TransporterRepository, TruckHiringNoteRepository,
};

/// Applies the embedded SQL migrations
///
/// # Errors
///
/// Returns `MigrationFailed` if any migration cannot be applied.
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
