//! Lorry receipt handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::{CustomerId, LorryReceiptId, VehicleId};
use domain_freight::{LorryReceipt, LorryReceiptStatus};
use domain_numbering::SequenceKey;
use infra_db::LorryReceiptRepository;

use crate::dto::lorry_receipt::{
    CreateLorryReceiptRequest, LorryReceiptChargesRequest, LorryReceiptResponse,
    UpdateStatusRequest,
};
use crate::dto::{parse_currency, Pagination};
use crate::error::ApiError;
use crate::AppState;

fn repository(state: &AppState) -> LorryReceiptRepository {
    LorryReceiptRepository::new(state.pool.clone())
}

async fn load(
    repo: &LorryReceiptRepository,
    id: LorryReceiptId,
) -> Result<LorryReceipt, ApiError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("lorry receipt {id} not found")))
}

/// Creates a lorry receipt with a freshly allocated LR number
pub async fn create_lorry_receipt(
    State(state): State<AppState>,
    Json(request): Json<CreateLorryReceiptRequest>,
) -> Result<Json<LorryReceiptResponse>, ApiError> {
    let currency = parse_currency(&request.currency)?;
    let lr_number = state.allocator.allocate(SequenceKey::LorryReceipt).await?;

    let mut receipt = LorryReceipt::new(
        lr_number,
        request.date,
        CustomerId::from(request.consignor_id),
        CustomerId::from(request.consignee_id),
        VehicleId::from(request.vehicle_id),
        request.vehicle_number,
        request.from_location,
        request.to_location,
        currency,
    )?;
    if let Some(charges) = request.charges {
        receipt.set_charges(charges.into_charges(currency))?;
    }

    repository(&state).insert(&receipt).await?;
    Ok(Json(LorryReceiptResponse::from(&receipt)))
}

/// Lists lorry receipts
pub async fn list_lorry_receipts(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<LorryReceiptResponse>>, ApiError> {
    let receipts = repository(&state).list(page.limit(), page.offset()).await?;
    Ok(Json(receipts.iter().map(LorryReceiptResponse::from).collect()))
}

/// Gets a lorry receipt by ID
pub async fn get_lorry_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LorryReceiptResponse>, ApiError> {
    let receipt = load(&repository(&state), LorryReceiptId::from(id)).await?;
    Ok(Json(LorryReceiptResponse::from(&receipt)))
}

/// Replaces the itemized charges, recomputing the receipt total
pub async fn update_charges(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LorryReceiptChargesRequest>,
) -> Result<Json<LorryReceiptResponse>, ApiError> {
    let repo = repository(&state);
    let mut receipt = load(&repo, LorryReceiptId::from(id)).await?;

    let currency = receipt.total_amount.currency();
    receipt.set_charges(request.into_charges(currency))?;
    repo.update(&receipt).await?;
    Ok(Json(LorryReceiptResponse::from(&receipt)))
}

/// Moves a receipt forward in its lifecycle
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<LorryReceiptResponse>, ApiError> {
    let repo = repository(&state);
    let mut receipt = load(&repo, LorryReceiptId::from(id)).await?;

    match (request.status, request.delivery_date) {
        (LorryReceiptStatus::Delivered, Some(date)) => receipt.mark_delivered(date)?,
        (status, _) => receipt.transition_to(status)?,
    }

    repo.update(&receipt).await?;
    Ok(Json(LorryReceiptResponse::from(&receipt)))
}

/// Deletes a lorry receipt that has not been billed
pub async fn delete_lorry_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = repository(&state);
    let id = LorryReceiptId::from(id);
    let receipt = load(&repo, id).await?;

    if matches!(
        receipt.status,
        LorryReceiptStatus::Invoiced | LorryReceiptStatus::Paid
    ) {
        return Err(ApiError::Conflict(format!(
            "lorry receipt {id} is billed on an invoice"
        )));
    }

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
