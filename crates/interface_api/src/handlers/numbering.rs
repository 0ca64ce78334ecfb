//! Sequence counter administration handlers

use axum::{
    extract::{Path, State},
    Json,
};

use domain_numbering::SequenceKey;

use crate::dto::numbering::{ConfigureCounterRequest, CounterResponse};
use crate::error::ApiError;
use crate::AppState;

/// Lists all configured counters
pub async fn list_counters(
    State(state): State<AppState>,
) -> Result<Json<Vec<CounterResponse>>, ApiError> {
    let counters = state.allocator.counters().await?;
    Ok(Json(counters.iter().map(CounterResponse::from).collect()))
}

/// Creates or updates the number window for a key
pub async fn configure_counter(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<ConfigureCounterRequest>,
) -> Result<Json<CounterResponse>, ApiError> {
    let key: SequenceKey = key
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown sequence key: {key}")))?;

    let counter = state
        .allocator
        .configure(
            key,
            request.range_start,
            request.range_end,
            request.allow_outside_range,
        )
        .await?;

    Ok(Json(CounterResponse::from(&counter)))
}
