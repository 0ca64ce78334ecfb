//! Party repositories
//!
//! Customers and transporters are stored as JSONB payloads with a name
//! column for listing. Parties have no derived columns; the payload is the
//! whole record.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use core_kernel::{CustomerId, TransporterId};
use domain_freight::{Customer, Transporter};

use crate::error::{classify, DatabaseError};
use crate::pool::DatabasePool;

fn to_payload<T: Serialize>(party: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(party).map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

fn from_payload<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, DatabaseError> {
    serde_json::from_value(payload).map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

/// Repository for billing customers
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: DatabasePool,
}

impl CustomerRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, customer: &Customer) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO customers (id, name, payload) VALUES ($1, $2, $3)")
            .bind(Uuid::from(customer.id))
            .bind(&customer.name)
            .bind(to_payload(customer)?)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }

    pub async fn update(&self, customer: &Customer) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE customers SET name = $2, payload = $3 WHERE id = $1")
            .bind(Uuid::from(customer.id))
            .bind(&customer.name)
            .bind(to_payload(customer)?)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", customer.id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DatabaseError> {
        let row = sqlx::query("SELECT payload FROM customers WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        row.map(|row| from_payload(row.try_get("payload")?)).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Customer>, DatabaseError> {
        let rows = sqlx::query("SELECT payload FROM customers ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        rows.into_iter()
            .map(|row| from_payload(row.try_get("payload")?))
            .collect()
    }
}

/// Repository for transporters
#[derive(Debug, Clone)]
pub struct TransporterRepository {
    pool: DatabasePool,
}

impl TransporterRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, transporter: &Transporter) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO transporters (id, name, is_active, payload) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::from(transporter.id))
        .bind(&transporter.name)
        .bind(transporter.is_active)
        .bind(to_payload(transporter)?)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }

    pub async fn update(&self, transporter: &Transporter) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE transporters SET name = $2, is_active = $3, payload = $4 WHERE id = $1",
        )
        .bind(Uuid::from(transporter.id))
        .bind(&transporter.name)
        .bind(transporter.is_active)
        .bind(to_payload(transporter)?)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Transporter", transporter.id));
        }
        Ok(())
    }

    pub async fn find_by_id(
        &self,
        id: TransporterId,
    ) -> Result<Option<Transporter>, DatabaseError> {
        let row = sqlx::query("SELECT payload FROM transporters WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        row.map(|row| from_payload(row.try_get("payload")?)).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Transporter>, DatabaseError> {
        let rows = sqlx::query("SELECT payload FROM transporters ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        rows.into_iter()
            .map(|row| from_payload(row.try_get("payload")?))
            .collect()
    }

    /// Lists only the transporters available for new hiring notes
    pub async fn list_active(&self) -> Result<Vec<Transporter>, DatabaseError> {
        let rows =
            sqlx::query("SELECT payload FROM transporters WHERE is_active = true ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(classify)?;

        rows.into_iter()
            .map(|row| from_payload(row.try_get("payload")?))
            .collect()
    }
}
