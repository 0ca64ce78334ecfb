//! Truck hiring note handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::{Money, TransporterId, TruckHiringNoteId};
use domain_freight::{TransporterSnapshot, TruckHiringNote};
use domain_ledger::DocumentRef;
use domain_numbering::SequenceKey;
use infra_db::{TransporterRepository, TruckHiringNoteRepository};

use crate::dto::truck_hiring_note::{
    AttachPodRequest, CreateTruckHiringNoteRequest, MarkRemindedRequest, TruckHiringNoteResponse,
    UpdateTruckHiringNoteRequest,
};
use crate::dto::{parse_currency, Pagination};
use crate::error::ApiError;
use crate::AppState;

fn repository(state: &AppState) -> TruckHiringNoteRepository {
    TruckHiringNoteRepository::new(state.pool.clone())
}

async fn load(
    repo: &TruckHiringNoteRepository,
    id: TruckHiringNoteId,
) -> Result<TruckHiringNote, ApiError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("truck hiring note {id} not found")))
}

/// Resolves the transporter snapshot: a registered transporter by ID, or
/// the ad-hoc party fields on the request
async fn resolve_transporter(
    state: &AppState,
    request: &CreateTruckHiringNoteRequest,
) -> Result<(Option<TransporterId>, TransporterSnapshot), ApiError> {
    if let Some(id) = request.transporter_id {
        let id = TransporterId::from(id);
        let transporter = TransporterRepository::new(state.pool.clone())
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("transporter {id} not found")))?;
        if !transporter.is_active {
            return Err(ApiError::Validation(format!(
                "transporter {id} is inactive"
            )));
        }
        return Ok((Some(id), TransporterSnapshot::from(&transporter)));
    }
    match &request.transporter {
        Some(snapshot) => Ok((
            None,
            TransporterSnapshot {
                name: snapshot.name.clone(),
                phone: snapshot.phone.clone(),
                address: snapshot.address.clone(),
                gstin: snapshot.gstin.clone(),
                pan: snapshot.pan.clone(),
            },
        )),
        None => Err(ApiError::BadRequest(
            "transporter_id or transporter details are required".to_string(),
        )),
    }
}

/// Creates a truck hiring note with a freshly allocated THN number
pub async fn create_truck_hiring_note(
    State(state): State<AppState>,
    Json(request): Json<CreateTruckHiringNoteRequest>,
) -> Result<Json<TruckHiringNoteResponse>, ApiError> {
    let currency = parse_currency(&request.currency)?;
    let (transporter_id, snapshot) = resolve_transporter(&state, &request).await?;
    let thn_number = state.allocator.allocate(SequenceKey::TruckHiringNote).await?;

    let mut builder = TruckHiringNote::builder(
        thn_number,
        request.date,
        snapshot,
        request.truck_number.clone(),
        request.expected_delivery_date,
    )
    .route(request.origin.clone(), request.destination.clone())
    .goods(request.goods_type.clone(), request.weight)
    .charges(request.charges.into_charges(currency));

    if let Some(id) = transporter_id {
        builder = builder.transporter_id(id);
    }
    if let Some(date) = request.loading_date {
        builder = builder.loading_date(date);
    }
    if let Some(advance) = request.advance_paid {
        builder = builder.advance_paid(Money::new(advance, currency));
    }
    if let Some(terms) = request.payment_terms {
        builder = builder.payment_terms(terms);
    }
    if let Some(reference) = request.payment_reference {
        builder = builder.payment_reference(reference);
    }
    if let Some(instructions) = request.special_instructions {
        builder = builder.special_instructions(instructions);
    }
    if request.is_draft {
        builder = builder.draft();
    }

    let note = builder.build()?;
    repository(&state).insert(&note).await?;
    Ok(Json(TruckHiringNoteResponse::from(&note)))
}

/// Lists truck hiring notes
pub async fn list_truck_hiring_notes(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<TruckHiringNoteResponse>>, ApiError> {
    let notes = repository(&state).list(page.limit(), page.offset()).await?;
    Ok(Json(notes.iter().map(TruckHiringNoteResponse::from).collect()))
}

/// Lists non-draft notes with an outstanding balance
pub async fn list_outstanding(
    State(state): State<AppState>,
) -> Result<Json<Vec<TruckHiringNoteResponse>>, ApiError> {
    let notes = repository(&state).list_outstanding().await?;
    Ok(Json(notes.iter().map(TruckHiringNoteResponse::from).collect()))
}

/// Gets a truck hiring note by ID
pub async fn get_truck_hiring_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TruckHiringNoteResponse>, ApiError> {
    let note = load(&repository(&state), TruckHiringNoteId::from(id)).await?;
    Ok(Json(TruckHiringNoteResponse::from(&note)))
}

/// Edits a note's trip, charge, and payment-term fields
///
/// The settlement fields are re-derived against the live payment ledger
/// through the reconciler's conditional commit, so a payment recorded
/// while the edit was in flight is never rolled back.
pub async fn update_truck_hiring_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTruckHiringNoteRequest>,
) -> Result<Json<TruckHiringNoteResponse>, ApiError> {
    let repo = repository(&state);
    let mut note = load(&repo, TruckHiringNoteId::from(id)).await?;
    let currency = note.ledger.total_charges.currency();

    if let Some(date) = request.date {
        note.date = date;
    }
    if let Some(truck_number) = request.truck_number {
        note.truck_number = truck_number;
    }
    if let Some(origin) = request.origin {
        note.origin = origin;
    }
    if let Some(destination) = request.destination {
        note.destination = destination;
    }
    if let Some(goods_type) = request.goods_type {
        note.goods_type = goods_type;
    }
    if let Some(weight) = request.weight {
        note.weight = weight;
    }
    if let Some(date) = request.loading_date {
        note.loading_date = Some(date);
    }
    if let Some(date) = request.expected_delivery_date {
        note.expected_delivery_date = date;
    }
    if let Some(charges) = request.charges {
        note.charges = charges.into_charges(currency);
    }
    if let Some(advance) = request.advance_paid {
        note.advance_paid = Money::new(advance, currency);
    }
    if let Some(terms) = request.payment_terms {
        note.payment_terms = Some(terms);
    }
    if let Some(reference) = request.payment_reference {
        note.payment_reference = Some(reference);
    }
    if let Some(instructions) = request.special_instructions {
        note.special_instructions = Some(instructions);
    }
    if let Some(is_draft) = request.is_draft {
        note.is_draft = is_draft;
    }
    note.updated_at = chrono::Utc::now();
    note.validate()?;

    note.ledger = state
        .reconciler
        .on_document_edit(
            DocumentRef::TruckHiringNote(note.id),
            &note.charges.breakdown(),
            note.advance_paid,
        )
        .await?;
    repo.update(&note).await?;
    Ok(Json(TruckHiringNoteResponse::from(&note)))
}

/// Deletes a truck hiring note
///
/// Payments recorded against the note are unlinked, not deleted; they
/// remain on the customer's ledger as general receipts.
pub async fn delete_truck_hiring_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    repository(&state).delete(TruckHiringNoteId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attaches a proof-of-delivery image key
pub async fn attach_pod(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachPodRequest>,
) -> Result<Json<TruckHiringNoteResponse>, ApiError> {
    let repo = repository(&state);
    let mut note = load(&repo, TruckHiringNoteId::from(id)).await?;
    note.attach_pod(request.image_key);
    repo.update(&note).await?;
    Ok(Json(TruckHiringNoteResponse::from(&note)))
}

/// Records that a settlement reminder was sent
pub async fn mark_reminded(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MarkRemindedRequest>,
) -> Result<Json<TruckHiringNoteResponse>, ApiError> {
    let repo = repository(&state);
    let mut note = load(&repo, TruckHiringNoteId::from(id)).await?;
    note.mark_reminded(request.date);
    repo.update(&note).await?;
    Ok(Json(TruckHiringNoteResponse::from(&note)))
}
