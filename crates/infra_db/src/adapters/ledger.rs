//! Postgres ledger store
//!
//! `snapshot` reads a document's stored fields together with a fresh SUM
//! over its linked payments; `commit` is a conditional UPDATE on the stored
//! `paid_amount`, which serializes concurrent reconcilers of the same
//! document. Invoices and truck hiring notes live in separate tables with
//! identical ledger columns.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use uuid::Uuid;

use core_kernel::{Currency, Money, PortError};
use domain_ledger::{DocumentRef, DocumentSnapshot, LedgerFields, LedgerStore, SettlementStatus};

use crate::error::port_err;
use crate::pool::DatabasePool;

/// SQLx-backed implementation of the ledger domain's store port
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: DatabasePool,
}

impl PostgresLedgerStore {
    /// Creates a store over the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Table and payment link column for each settleable document type
fn table_for(document: DocumentRef) -> (&'static str, &'static str, Uuid) {
    match document {
        DocumentRef::Invoice(id) => ("invoices", "invoice_id", id.into()),
        DocumentRef::TruckHiringNote(id) => ("truck_hiring_notes", "thn_id", id.into()),
    }
}

fn parse_currency(code: &str) -> Result<Currency, PortError> {
    code.parse()
        .map_err(|_| PortError::internal(format!("unknown currency in storage: {code}")))
}

fn parse_status(label: &str) -> Result<SettlementStatus, PortError> {
    label
        .parse()
        .map_err(|_| PortError::internal(format!("unknown settlement status in storage: {label}")))
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn snapshot(&self, document: DocumentRef) -> Result<Option<DocumentSnapshot>, PortError> {
        let (table, link_column, id) = table_for(document);
        let sql = format!(
            r#"
            SELECT d.currency,
                   d.total_charges,
                   d.advance_paid,
                   d.paid_amount,
                   d.balance_payable,
                   d.status,
                   COALESCE(
                       (SELECT SUM(p.amount) FROM payments p WHERE p.{link_column} = d.id),
                       0
                   ) AS settled
            FROM {table} d
            WHERE d.id = $1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(port_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let currency: String = row.try_get("currency").map_err(port_err)?;
        let currency = parse_currency(&currency)?;
        let status: String = row.try_get("status").map_err(port_err)?;

        let money = |column: &str| -> Result<Money, PortError> {
            let amount: Decimal = row.try_get(column).map_err(port_err)?;
            Ok(Money::new(amount, currency))
        };

        Ok(Some(DocumentSnapshot {
            fields: LedgerFields {
                total_charges: money("total_charges")?,
                advance_paid: money("advance_paid")?,
                paid_amount: money("paid_amount")?,
                balance_payable: money("balance_payable")?,
                status: parse_status(&status)?,
            },
            settled: money("settled")?,
        }))
    }

    async fn commit(
        &self,
        document: DocumentRef,
        fields: &LedgerFields,
        expected_paid: Money,
    ) -> Result<bool, PortError> {
        let (table, _, id) = table_for(document);
        let sql = format!(
            r#"
            UPDATE {table}
            SET total_charges = $2,
                advance_paid = $3,
                paid_amount = $4,
                balance_payable = $5,
                status = $6,
                updated_at = now()
            WHERE id = $1 AND paid_amount = $7
            "#
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(fields.total_charges.amount())
            .bind(fields.advance_paid.amount())
            .bind(fields.paid_amount.amount())
            .bind(fields.balance_payable.amount())
            .bind(fields.status.as_str())
            .bind(expected_paid.amount())
            .execute(&self.pool)
            .await
            .map_err(port_err)?;

        Ok(result.rows_affected() == 1)
    }
}
