//! Payment handlers
//!
//! Every mutation runs the ledger reconciler over the affected documents
//! before responding, so a successful payment write always leaves the
//! targets' derived fields consistent.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use core_kernel::{CustomerId, Money, PaymentId};
use domain_ledger::Payment;
use infra_db::PaymentRepository;

use crate::dto::parse_currency;
use crate::dto::payment::{PaymentRequest, PaymentResponse};
use crate::error::ApiError;
use crate::AppState;

fn repository(state: &AppState) -> PaymentRepository {
    PaymentRepository::new(state.pool.clone())
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub customer_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub thn_id: Option<Uuid>,
}

/// Records a payment and reconciles its target
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let currency = parse_currency(&request.currency)?;
    let target = request.target()?;

    let mut payment = Payment::new(
        CustomerId::from(request.customer_id),
        request.date,
        Money::new(request.amount, currency),
        request.kind,
        request.mode,
    );
    payment.target = target;
    payment.reference_no = request.reference_no;
    payment.notes = request.notes;
    payment.validate()?;

    let change = repository(&state).insert(&payment).await?;
    state.reconciler.on_payment_change(&change).await?;

    Ok(Json(PaymentResponse::from(&payment)))
}

/// Edits a payment (amount, target, details) and reconciles both the
/// former and the new target
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let currency = parse_currency(&request.currency)?;
    let repo = repository(&state);
    let id = PaymentId::from(id);

    let mut payment = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))?;

    payment.customer_id = CustomerId::from(request.customer_id);
    payment.date = request.date;
    payment.amount = Money::new(request.amount, currency);
    payment.kind = request.kind;
    payment.mode = request.mode;
    payment.target = request.target()?;
    payment.reference_no = request.reference_no;
    payment.notes = request.notes;
    payment.validate()?;

    let change = repo.update(&payment).await?;
    state.reconciler.on_payment_change(&change).await?;

    Ok(Json(PaymentResponse::from(&payment)))
}

/// Deletes a payment and reconciles its former target
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let change = repository(&state).delete(PaymentId::from(id)).await?;
    state.reconciler.on_payment_change(&change).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Gets a payment by ID
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let id = PaymentId::from(id);
    let payment = repository(&state)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// Lists payments for a document or a customer
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    use domain_ledger::DocumentRef;

    let repo = repository(&state);
    let payments = if let Some(id) = query.invoice_id {
        repo.list_for_document(DocumentRef::Invoice(id.into())).await?
    } else if let Some(id) = query.thn_id {
        repo.list_for_document(DocumentRef::TruckHiringNote(id.into())).await?
    } else if let Some(id) = query.customer_id {
        repo.list_for_customer(CustomerId::from(id)).await?
    } else {
        return Err(ApiError::BadRequest(
            "one of customer_id, invoice_id, thn_id is required".to_string(),
        ));
    };

    Ok(Json(payments.iter().map(PaymentResponse::from).collect()))
}
