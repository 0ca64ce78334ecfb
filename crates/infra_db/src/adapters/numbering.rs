//! Postgres sequence counter store
//!
//! Allocation atomicity comes from the conditional UPDATE in
//! `compare_and_advance`: Postgres row-level locking makes the
//! `next = expected` check-and-set a single atomic step, so two racing
//! allocators can never both succeed for the same expected value.

use async_trait::async_trait;
use sqlx::Row;

use core_kernel::PortError;
use domain_numbering::{SequenceCounter, SequenceKey, SequenceStore};

use crate::error::port_err;
use crate::pool::DatabasePool;

/// SQLx-backed implementation of the numbering domain's store port
#[derive(Debug, Clone)]
pub struct PostgresSequenceStore {
    pool: DatabasePool,
}

impl PostgresSequenceStore {
    /// Creates a store over the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_counter(row: &sqlx::postgres::PgRow) -> Result<SequenceCounter, PortError> {
    let key: String = row.try_get("key").map_err(port_err)?;
    let key: SequenceKey = key
        .parse()
        .map_err(|_| PortError::internal(format!("unknown sequence key in storage: {key}")))?;
    Ok(SequenceCounter {
        key,
        range_start: row.try_get("range_start").map_err(port_err)?,
        range_end: row.try_get("range_end").map_err(port_err)?,
        next: row.try_get("next_value").map_err(port_err)?,
        allow_outside_range: row.try_get("allow_outside_range").map_err(port_err)?,
    })
}

#[async_trait]
impl SequenceStore for PostgresSequenceStore {
    async fn find(&self, key: SequenceKey) -> Result<Option<SequenceCounter>, PortError> {
        let row = sqlx::query(
            r#"
            SELECT key, range_start, range_end, next_value, allow_outside_range
            FROM sequence_counters
            WHERE key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(port_err)?;

        row.as_ref().map(row_to_counter).transpose()
    }

    async fn insert(&self, counter: &SequenceCounter) -> Result<bool, PortError> {
        // ON CONFLICT DO NOTHING reports the lost creation race through
        // the affected-row count
        let result = sqlx::query(
            r#"
            INSERT INTO sequence_counters
                (key, range_start, range_end, next_value, allow_outside_range)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(counter.key.as_str())
        .bind(counter.range_start)
        .bind(counter.range_end)
        .bind(counter.next)
        .bind(counter.allow_outside_range)
        .execute(&self.pool)
        .await
        .map_err(port_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn compare_and_advance(
        &self,
        key: SequenceKey,
        expected: i64,
        new: i64,
    ) -> Result<bool, PortError> {
        let result = sqlx::query(
            r#"
            UPDATE sequence_counters
            SET next_value = $3, updated_at = now()
            WHERE key = $1 AND next_value = $2
            "#,
        )
        .bind(key.as_str())
        .bind(expected)
        .bind(new)
        .execute(&self.pool)
        .await
        .map_err(port_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn save_config(&self, counter: &SequenceCounter) -> Result<(), PortError> {
        sqlx::query(
            r#"
            UPDATE sequence_counters
            SET range_start = $2,
                range_end = $3,
                next_value = $4,
                allow_outside_range = $5,
                updated_at = now()
            WHERE key = $1
            "#,
        )
        .bind(counter.key.as_str())
        .bind(counter.range_start)
        .bind(counter.range_end)
        .bind(counter.next)
        .bind(counter.allow_outside_range)
        .execute(&self.pool)
        .await
        .map_err(port_err)?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SequenceCounter>, PortError> {
        let rows = sqlx::query(
            r#"
            SELECT key, range_start, range_end, next_value, allow_outside_range
            FROM sequence_counters
            ORDER BY key
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(port_err)?;

        rows.iter().map(row_to_counter).collect()
    }
}
