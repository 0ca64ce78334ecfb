//! Party DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_freight::{Customer, Transporter};

#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub trade_name: Option<String>,
    pub address: String,
    pub state: String,
    pub gstin: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub trade_name: Option<String>,
    pub address: String,
    pub state: String,
    pub gstin: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: Uuid::from(customer.id),
            name: customer.name.clone(),
            trade_name: customer.trade_name.clone(),
            address: customer.address.clone(),
            state: customer.state.clone(),
            gstin: customer.gstin.clone(),
            contact_person: customer.contact_person.clone(),
            contact_phone: customer.contact_phone.clone(),
            contact_email: customer.contact_email.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransporterRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TransporterResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Transporter> for TransporterResponse {
    fn from(transporter: &Transporter) -> Self {
        Self {
            id: Uuid::from(transporter.id),
            name: transporter.name.clone(),
            phone: transporter.phone.clone(),
            address: transporter.address.clone(),
            gstin: transporter.gstin.clone(),
            pan: transporter.pan.clone(),
            is_active: transporter.is_active,
            created_at: transporter.created_at,
        }
    }
}
