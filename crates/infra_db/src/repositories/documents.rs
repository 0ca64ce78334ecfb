//! Freight document repositories
//!
//! One repository per document type. Each row carries the full document as
//! a JSONB payload plus the columns list screens and the ledger adapter
//! work against. On read, the ledger columns win over the payload's copy
//! of the derived fields.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use core_kernel::{Currency, InvoiceId, LorryReceiptId, Money, TruckHiringNoteId};
use domain_freight::{Invoice, LorryReceipt, TruckHiringNote};
use domain_ledger::LedgerFields;

use crate::error::{classify, DatabaseError};
use crate::pool::DatabasePool;

fn to_payload<T: Serialize>(document: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(document).map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

fn from_payload<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, DatabaseError> {
    serde_json::from_value(payload).map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

/// Reads the authoritative ledger columns off a document row
fn ledger_from_row(row: &PgRow) -> Result<LedgerFields, DatabaseError> {
    let currency: String = row.try_get("currency")?;
    let currency: Currency = currency
        .parse()
        .map_err(|_| DatabaseError::SerializationError(format!("unknown currency: {currency}")))?;
    let status: String = row.try_get("status")?;
    let status = status
        .parse()
        .map_err(|_| DatabaseError::SerializationError(format!("unknown status: {status}")))?;

    let money = |column: &str| -> Result<Money, DatabaseError> {
        let amount: Decimal = row.try_get(column)?;
        Ok(Money::new(amount, currency))
    };

    Ok(LedgerFields {
        total_charges: money("total_charges")?,
        advance_paid: money("advance_paid")?,
        paid_amount: money("paid_amount")?,
        balance_payable: money("balance_payable")?,
        status,
    })
}

/// Repository for lorry receipts
#[derive(Debug, Clone)]
pub struct LorryReceiptRepository {
    pool: DatabasePool,
}

impl LorryReceiptRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Persists a new lorry receipt
    pub async fn insert(&self, receipt: &LorryReceipt) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO lorry_receipts
                (id, lr_number, lr_date, status, consignor_id, consignee_id,
                 currency, total_amount, payload, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(Uuid::from(receipt.id))
        .bind(receipt.lr_number)
        .bind(receipt.date)
        .bind(receipt.status.to_string())
        .bind(Uuid::from(receipt.consignor_id))
        .bind(Uuid::from(receipt.consignee_id))
        .bind(receipt.total_amount.currency().code())
        .bind(receipt.total_amount.amount())
        .bind(to_payload(receipt)?)
        .bind(receipt.created_at)
        .bind(receipt.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }

    /// Rewrites an existing lorry receipt
    pub async fn update(&self, receipt: &LorryReceipt) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE lorry_receipts
            SET status = $2, total_amount = $3, payload = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(receipt.id))
        .bind(receipt.status.to_string())
        .bind(receipt.total_amount.amount())
        .bind(to_payload(receipt)?)
        .bind(receipt.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("LorryReceipt", receipt.id));
        }
        Ok(())
    }

    /// Deletes a lorry receipt
    pub async fn delete(&self, id: LorryReceiptId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM lorry_receipts WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("LorryReceipt", id));
        }
        Ok(())
    }

    /// Loads a lorry receipt by id
    pub async fn find_by_id(&self, id: LorryReceiptId) -> Result<Option<LorryReceipt>, DatabaseError> {
        let row = sqlx::query("SELECT payload FROM lorry_receipts WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        row.map(|row| from_payload(row.try_get("payload")?)).transpose()
    }

    /// Lists receipts, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<LorryReceipt>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT payload FROM lorry_receipts ORDER BY lr_number DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter()
            .map(|row| from_payload(row.try_get("payload")?))
            .collect()
    }
}

/// Repository for invoices
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: DatabasePool,
}

impl InvoiceRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Persists a new invoice with its derived ledger columns
    pub async fn insert(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO invoices
                (id, invoice_number, invoice_date, customer_id, currency,
                 total_charges, advance_paid, paid_amount, balance_payable,
                 status, payload, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(Uuid::from(invoice.id))
        .bind(invoice.invoice_number)
        .bind(invoice.date)
        .bind(Uuid::from(invoice.customer_id))
        .bind(invoice.ledger.total_charges.currency().code())
        .bind(invoice.ledger.total_charges.amount())
        .bind(invoice.ledger.advance_paid.amount())
        .bind(invoice.ledger.paid_amount.amount())
        .bind(invoice.ledger.balance_payable.amount())
        .bind(invoice.ledger.status.as_str())
        .bind(to_payload(invoice)?)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }

    /// Rewrites an invoice's source fields
    ///
    /// The ledger columns are deliberately left alone: they are committed
    /// only through the ledger store's conditional update, so a source-field
    /// edit can never overwrite a settlement that landed after the caller
    /// loaded the row.
    pub async fn update(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET invoice_date = $2,
                customer_id = $3,
                payload = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(invoice.id))
        .bind(invoice.date)
        .bind(Uuid::from(invoice.customer_id))
        .bind(to_payload(invoice)?)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Invoice", invoice.id));
        }
        Ok(())
    }

    /// Deletes an invoice; linked payments are unlinked by the foreign key
    pub async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Invoice", id));
        }
        Ok(())
    }

    /// Loads an invoice, patching the derived fields from the columns
    pub async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT payload, currency, total_charges, advance_paid,
                   paid_amount, balance_payable, status
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        row.map(|row| {
            let mut invoice: Invoice = from_payload(row.try_get("payload")?)?;
            invoice.ledger = ledger_from_row(&row)?;
            Ok(invoice)
        })
        .transpose()
    }

    /// Lists invoices, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Invoice>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT payload, currency, total_charges, advance_paid,
                   paid_amount, balance_payable, status
            FROM invoices
            ORDER BY invoice_number DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter()
            .map(|row| {
                let mut invoice: Invoice = from_payload(row.try_get("payload")?)?;
                invoice.ledger = ledger_from_row(&row)?;
                Ok(invoice)
            })
            .collect()
    }
}

/// Repository for truck hiring notes
#[derive(Debug, Clone)]
pub struct TruckHiringNoteRepository {
    pool: DatabasePool,
}

impl TruckHiringNoteRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Persists a new truck hiring note with its derived ledger columns
    pub async fn insert(&self, note: &TruckHiringNote) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO truck_hiring_notes
                (id, thn_number, thn_date, transporter_id, is_draft, currency,
                 total_charges, advance_paid, paid_amount, balance_payable,
                 status, payload, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(Uuid::from(note.id))
        .bind(note.thn_number)
        .bind(note.date)
        .bind(note.transporter_id.map(Uuid::from))
        .bind(note.is_draft)
        .bind(note.ledger.total_charges.currency().code())
        .bind(note.ledger.total_charges.amount())
        .bind(note.ledger.advance_paid.amount())
        .bind(note.ledger.paid_amount.amount())
        .bind(note.ledger.balance_payable.amount())
        .bind(note.ledger.status.as_str())
        .bind(to_payload(note)?)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }

    /// Rewrites a note's source fields
    ///
    /// The ledger columns are deliberately left alone: they are committed
    /// only through the ledger store's conditional update, so a source-field
    /// edit can never overwrite a settlement that landed after the caller
    /// loaded the row.
    pub async fn update(&self, note: &TruckHiringNote) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE truck_hiring_notes
            SET thn_date = $2,
                transporter_id = $3,
                is_draft = $4,
                payload = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(note.id))
        .bind(note.date)
        .bind(note.transporter_id.map(Uuid::from))
        .bind(note.is_draft)
        .bind(to_payload(note)?)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("TruckHiringNote", note.id));
        }
        Ok(())
    }

    /// Deletes a note; linked payments are unlinked by the foreign key
    pub async fn delete(&self, id: TruckHiringNoteId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM truck_hiring_notes WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("TruckHiringNote", id));
        }
        Ok(())
    }

    /// Loads a note, patching the derived fields from the columns
    pub async fn find_by_id(
        &self,
        id: TruckHiringNoteId,
    ) -> Result<Option<TruckHiringNote>, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT payload, currency, total_charges, advance_paid,
                   paid_amount, balance_payable, status
            FROM truck_hiring_notes
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        row.map(|row| {
            let mut note: TruckHiringNote = from_payload(row.try_get("payload")?)?;
            note.ledger = ledger_from_row(&row)?;
            Ok(note)
        })
        .transpose()
    }

    /// Lists notes, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<TruckHiringNote>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT payload, currency, total_charges, advance_paid,
                   paid_amount, balance_payable, status
            FROM truck_hiring_notes
            ORDER BY thn_number DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter()
            .map(|row| {
                let mut note: TruckHiringNote = from_payload(row.try_get("payload")?)?;
                note.ledger = ledger_from_row(&row)?;
                Ok(note)
            })
            .collect()
    }

    /// Lists non-draft notes with an outstanding balance, for the reminder
    /// screen
    pub async fn list_outstanding(&self) -> Result<Vec<TruckHiringNote>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT payload, currency, total_charges, advance_paid,
                   paid_amount, balance_payable, status
            FROM truck_hiring_notes
            WHERE is_draft = false AND status <> 'Paid'
            ORDER BY thn_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter()
            .map(|row| {
                let mut note: TruckHiringNote = from_payload(row.try_get("payload")?)?;
                note.ledger = ledger_from_row(&row)?;
                Ok(note)
            })
            .collect()
    }
}
