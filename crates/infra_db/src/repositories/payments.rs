//! Payment repository
//!
//! Payments live in their own table and link to the document they settle
//! through nullable `invoice_id`/`thn_id` columns. Mutations return the
//! `PaymentChange` event the reconciler consumes, capturing the previous
//! target where one existed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use core_kernel::{Currency, CustomerId, InvoiceId, Money, PaymentId, TruckHiringNoteId};
use domain_ledger::{DocumentRef, Payment, PaymentChange, PaymentKind, PaymentMode};

use crate::error::{classify, DatabaseError};
use crate::pool::DatabasePool;

/// Splits a target into its two nullable link columns
fn target_columns(target: Option<DocumentRef>) -> (Option<Uuid>, Option<Uuid>) {
    match target {
        Some(DocumentRef::Invoice(id)) => (Some(id.into()), None),
        Some(DocumentRef::TruckHiringNote(id)) => (None, Some(id.into())),
        None => (None, None),
    }
}

/// Rebuilds a target from the link columns; None when both are null
fn target_from_columns(invoice_id: Option<Uuid>, thn_id: Option<Uuid>) -> Option<DocumentRef> {
    if let Some(id) = invoice_id {
        Some(DocumentRef::Invoice(InvoiceId::from(id)))
    } else {
        thn_id.map(|id| DocumentRef::TruckHiringNote(TruckHiringNoteId::from(id)))
    }
}

fn payment_from_row(row: &PgRow) -> Result<Payment, DatabaseError> {
    let currency: String = row.try_get("currency")?;
    let currency: Currency = currency
        .parse()
        .map_err(|_| DatabaseError::SerializationError(format!("unknown currency: {currency}")))?;
    let kind: String = row.try_get("kind")?;
    let kind: PaymentKind = kind
        .parse()
        .map_err(DatabaseError::SerializationError)?;
    let mode: String = row.try_get("mode")?;
    let mode: PaymentMode = mode
        .parse()
        .map_err(DatabaseError::SerializationError)?;

    let amount: Decimal = row.try_get("amount")?;
    let id: Uuid = row.try_get("id")?;
    let customer_id: Uuid = row.try_get("customer_id")?;
    let date: NaiveDate = row.try_get("payment_date")?;
    let invoice_id: Option<Uuid> = row.try_get("invoice_id")?;
    let thn_id: Option<Uuid> = row.try_get("thn_id")?;
    let reference_no: Option<String> = row.try_get("reference_no")?;
    let notes: Option<String> = row.try_get("notes")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Payment {
        id: PaymentId::from(id),
        customer_id: CustomerId::from(customer_id),
        date,
        amount: Money::new(amount, currency),
        kind,
        mode,
        target: target_from_columns(invoice_id, thn_id),
        reference_no,
        notes,
        created_at,
    })
}

/// Repository for payment records
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: DatabasePool,
}

impl PaymentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Persists a new payment
    ///
    /// Returns the change event to feed the reconciler.
    pub async fn insert(&self, payment: &Payment) -> Result<PaymentChange, DatabaseError> {
        let (invoice_id, thn_id) = target_columns(payment.target);
        sqlx::query(
            r#"
            INSERT INTO payments
                (id, customer_id, payment_date, amount, currency, kind, mode,
                 invoice_id, thn_id, reference_no, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(Uuid::from(payment.id))
        .bind(Uuid::from(payment.customer_id))
        .bind(payment.date)
        .bind(payment.amount.amount())
        .bind(payment.amount.currency().code())
        .bind(payment.kind.as_str())
        .bind(payment.mode.as_str())
        .bind(invoice_id)
        .bind(thn_id)
        .bind(payment.reference_no.as_deref())
        .bind(payment.notes.as_deref())
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(PaymentChange::created(payment.target))
    }

    /// Rewrites an existing payment
    ///
    /// Reads the stored target first so the returned change event covers a
    /// retarget: both the former and the new document get reconciled.
    pub async fn update(&self, payment: &Payment) -> Result<PaymentChange, DatabaseError> {
        let previous = sqlx::query("SELECT invoice_id, thn_id FROM payments WHERE id = $1")
            .bind(Uuid::from(payment.id))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or_else(|| DatabaseError::not_found("Payment", payment.id))?;

        let previous_target = target_from_columns(
            previous.try_get("invoice_id")?,
            previous.try_get("thn_id")?,
        );

        let (invoice_id, thn_id) = target_columns(payment.target);
        sqlx::query(
            r#"
            UPDATE payments
            SET customer_id = $2,
                payment_date = $3,
                amount = $4,
                currency = $5,
                kind = $6,
                mode = $7,
                invoice_id = $8,
                thn_id = $9,
                reference_no = $10,
                notes = $11
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(payment.id))
        .bind(Uuid::from(payment.customer_id))
        .bind(payment.date)
        .bind(payment.amount.amount())
        .bind(payment.amount.currency().code())
        .bind(payment.kind.as_str())
        .bind(payment.mode.as_str())
        .bind(invoice_id)
        .bind(thn_id)
        .bind(payment.reference_no.as_deref())
        .bind(payment.notes.as_deref())
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(PaymentChange::updated(previous_target, payment.target))
    }

    /// Deletes a payment, returning the change event for its former target
    pub async fn delete(&self, id: PaymentId) -> Result<PaymentChange, DatabaseError> {
        let row = sqlx::query("DELETE FROM payments WHERE id = $1 RETURNING invoice_id, thn_id")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or_else(|| DatabaseError::not_found("Payment", id))?;

        let previous_target =
            target_from_columns(row.try_get("invoice_id")?, row.try_get("thn_id")?);
        Ok(PaymentChange::deleted(previous_target))
    }

    /// Loads a payment by id
    pub async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM payments WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        row.map(|row| payment_from_row(&row)).transpose()
    }

    /// Lists the payments linked to a document, oldest first
    pub async fn list_for_document(
        &self,
        document: DocumentRef,
    ) -> Result<Vec<Payment>, DatabaseError> {
        let (column, id) = match document {
            DocumentRef::Invoice(id) => ("invoice_id", Uuid::from(id)),
            DocumentRef::TruckHiringNote(id) => ("thn_id", Uuid::from(id)),
        };
        let sql = format!("SELECT * FROM payments WHERE {column} = $1 ORDER BY payment_date, created_at");

        let rows = sqlx::query(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        rows.iter().map(payment_from_row).collect()
    }

    /// Lists a customer's payments, newest first
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Payment>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM payments WHERE customer_id = $1 ORDER BY payment_date DESC, created_at DESC",
        )
        .bind(Uuid::from(customer_id))
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.iter().map(payment_from_row).collect()
    }
}
