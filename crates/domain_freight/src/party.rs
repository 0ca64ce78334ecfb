//! Customers and transporters
//!
//! Minimal party records: enough identity to bill a customer and to
//! snapshot a transporter onto a truck hiring note. Documents keep a copy
//! of the party fields they were issued with, so later edits to the party
//! never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{CustomerId, TransporterId};

use crate::error::FreightError;

/// A billing customer (consignor or consignee on lorry receipts)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Legal name of business
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Trade name, if different from the legal name
    pub trade_name: Option<String>,
    /// Billing address
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    /// State, as printed on GST paperwork
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    /// GST identification number
    pub gstin: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub contact_email: Option<String>,
}

impl Customer {
    /// Creates a customer with the required identity fields
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: CustomerId::new(),
            name: name.into(),
            trade_name: None,
            address: address.into(),
            state: state.into(),
            gstin: None,
            contact_person: None,
            contact_phone: None,
            contact_email: None,
        }
    }

    /// Validates the customer's field formats
    ///
    /// # Errors
    ///
    /// Returns `FieldValidation` listing every failing field.
    pub fn validate_fields(&self) -> Result<(), FreightError> {
        self.validate()?;
        Ok(())
    }
}

/// A truck owner hired through truck hiring notes
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Transporter {
    /// Unique identifier
    pub id: TransporterId,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    /// Inactive transporters are hidden from new hiring notes
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transporter {
    /// Creates an active transporter
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TransporterId::new(),
            name: name.into(),
            phone: None,
            address: None,
            gstin: None,
            pan: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates the transporter's field formats
    pub fn validate_fields(&self) -> Result<(), FreightError> {
        self.validate()?;
        Ok(())
    }
}

/// Transporter fields as copied onto a truck hiring note at issue time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransporterSnapshot {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub pan: Option<String>,
}

impl From<&Transporter> for TransporterSnapshot {
    fn from(transporter: &Transporter) -> Self {
        Self {
            name: transporter.name.clone(),
            phone: transporter.phone.clone(),
            address: transporter.address.clone(),
            gstin: transporter.gstin.clone(),
            pan: transporter.pan.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_requires_name() {
        let mut customer = Customer::new("Sharma Traders", "14 MIDC Road", "Maharashtra");
        assert!(customer.validate_fields().is_ok());

        customer.name.clear();
        assert!(customer.validate_fields().is_err());
    }

    #[test]
    fn test_customer_email_format() {
        let mut customer = Customer::new("Sharma Traders", "14 MIDC Road", "Maharashtra");
        customer.contact_email = Some("accounts@sharmatraders.in".to_string());
        assert!(customer.validate_fields().is_ok());

        customer.contact_email = Some("not-an-email".to_string());
        assert!(customer.validate_fields().is_err());
    }

    #[test]
    fn test_snapshot_copies_issue_time_fields() {
        let mut transporter = Transporter::new("Patel Roadways");
        transporter.phone = Some("9822012345".to_string());
        transporter.pan = Some("ABCDE1234F".to_string());

        let snapshot = TransporterSnapshot::from(&transporter);
        assert_eq!(snapshot.name, "Patel Roadways");
        assert_eq!(snapshot.pan.as_deref(), Some("ABCDE1234F"));
        assert!(snapshot.gstin.is_none());
    }
}
