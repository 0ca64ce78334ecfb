//! Customer and transporter handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use core_kernel::{CustomerId, TransporterId};
use domain_freight::{Customer, Transporter};
use infra_db::{CustomerRepository, TransporterRepository};

use crate::dto::party::{
    CustomerRequest, CustomerResponse, TransporterRequest, TransporterResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// Creates a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let mut customer = Customer::new(request.name, request.address, request.state);
    customer.trade_name = request.trade_name;
    customer.gstin = request.gstin;
    customer.contact_person = request.contact_person;
    customer.contact_phone = request.contact_phone;
    customer.contact_email = request.contact_email;
    customer.validate_fields()?;

    CustomerRepository::new(state.pool.clone()).insert(&customer).await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// Updates a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let repo = CustomerRepository::new(state.pool.clone());
    let id = CustomerId::from(id);
    let mut customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;

    customer.name = request.name;
    customer.trade_name = request.trade_name;
    customer.address = request.address;
    customer.state = request.state;
    customer.gstin = request.gstin;
    customer.contact_person = request.contact_person;
    customer.contact_phone = request.contact_phone;
    customer.contact_email = request.contact_email;
    customer.validate_fields()?;

    repo.update(&customer).await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// Lists customers
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = CustomerRepository::new(state.pool.clone()).list().await?;
    Ok(Json(customers.iter().map(CustomerResponse::from).collect()))
}

/// Gets a customer by ID
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = CustomerId::from(id);
    let customer = CustomerRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
    Ok(Json(CustomerResponse::from(&customer)))
}

#[derive(Debug, Deserialize)]
pub struct ListTransportersQuery {
    #[serde(default)]
    pub active: bool,
}

/// Creates a transporter
pub async fn create_transporter(
    State(state): State<AppState>,
    Json(request): Json<TransporterRequest>,
) -> Result<Json<TransporterResponse>, ApiError> {
    let mut transporter = Transporter::new(request.name);
    transporter.phone = request.phone;
    transporter.address = request.address;
    transporter.gstin = request.gstin;
    transporter.pan = request.pan;
    if let Some(is_active) = request.is_active {
        transporter.is_active = is_active;
    }
    transporter.validate_fields()?;

    TransporterRepository::new(state.pool.clone()).insert(&transporter).await?;
    Ok(Json(TransporterResponse::from(&transporter)))
}

/// Updates a transporter
pub async fn update_transporter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransporterRequest>,
) -> Result<Json<TransporterResponse>, ApiError> {
    let repo = TransporterRepository::new(state.pool.clone());
    let id = TransporterId::from(id);
    let mut transporter = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("transporter {id} not found")))?;

    transporter.name = request.name;
    transporter.phone = request.phone;
    transporter.address = request.address;
    transporter.gstin = request.gstin;
    transporter.pan = request.pan;
    if let Some(is_active) = request.is_active {
        transporter.is_active = is_active;
    }
    transporter.updated_at = chrono::Utc::now();
    transporter.validate_fields()?;

    repo.update(&transporter).await?;
    Ok(Json(TransporterResponse::from(&transporter)))
}

/// Lists transporters, optionally only active ones
pub async fn list_transporters(
    State(state): State<AppState>,
    Query(query): Query<ListTransportersQuery>,
) -> Result<Json<Vec<TransporterResponse>>, ApiError> {
    let repo = TransporterRepository::new(state.pool.clone());
    let transporters = if query.active {
        repo.list_active().await?
    } else {
        repo.list().await?
    };
    Ok(Json(transporters.iter().map(TransporterResponse::from).collect()))
}

/// Gets a transporter by ID
pub async fn get_transporter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransporterResponse>, ApiError> {
    let id = TransporterId::from(id);
    let transporter = TransporterRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("transporter {id} not found")))?;
    Ok(Json(TransporterResponse::from(&transporter)))
}
