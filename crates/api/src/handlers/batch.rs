//! Handlers for batches: creation with QR issuance, listing, and the two
//! stock mutation paths (absolute overwrite and signed adjustment).

use alfirdaws_core::error::CoreError;
use alfirdaws_core::inventory::{self, BatchSource, BatchStatus, StockReason};
use alfirdaws_core::qr::{self, IssuedQrCode};
use alfirdaws_core::types::DbId;
use alfirdaws_db::models::batch::{
    AdjustBatch, Batch, BatchListParams, CreateBatch, UpdateBatchStock,
};
use alfirdaws_db::repositories::{BatchRepo, PlantTypeRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response for a newly created batch: the row plus its printable codes.
#[derive(Debug, Serialize)]
pub struct CreatedBatch {
    pub batch: Batch,
    #[serde(rename = "qrCodes")]
    pub qr_codes: Vec<IssuedQrCode>,
}

fn batch_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Batch", id })
}

/// Render every code for a batch on the blocking pool.
async fn issue_codes(
    base_url: &str,
    plant_type_id: DbId,
    batch_id: DbId,
    initial_quantity: i32,
) -> AppResult<Vec<IssuedQrCode>> {
    let base_url = base_url.to_string();
    let codes = tokio::task::spawn_blocking(move || {
        qr::issue_codes(&base_url, plant_type_id, batch_id, initial_quantity)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("QR task failed: {e}")))?
    .map_err(CoreError::from)?;
    Ok(codes)
}

// ---------------------------------------------------------------------------
// Creation and reads
// ---------------------------------------------------------------------------

/// POST /api/v1/batches
///
/// Create a batch and issue its QR codes. The row is committed only once
/// every code has been rendered.
pub async fn create_batch(
    State(state): State<AppState>,
    Json(input): Json<CreateBatch>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    inventory::validate_new_batch(
        input.initial_quantity,
        input.cost_per_plant,
        input.selling_price,
    )?;
    BatchSource::from_str_value(&input.source)?;

    if !PlantTypeRepo::exists(&state.pool, input.plant_type_id).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "plant_type_id {} does not exist",
            input.plant_type_id
        ))));
    }

    let status = BatchStatus::for_quantity(input.initial_quantity);

    let mut tx = state.pool.begin().await?;
    let batch = BatchRepo::create_in_tx(&mut tx, &input, status.as_str()).await?;
    let qr_codes = issue_codes(
        &state.config.public_base_url,
        batch.plant_type_id,
        batch.id,
        batch.initial_quantity,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        batch_id = batch.id,
        plant_type_id = batch.plant_type_id,
        initial_quantity = batch.initial_quantity,
        codes = qr_codes.len(),
        "Batch created",
    );

    Ok((StatusCode::CREATED, Json(CreatedBatch { batch, qr_codes })))
}

/// GET /api/v1/batches
///
/// Newest first. Supports `?search=` on the plant name and `?in_stock_only=`.
pub async fn list_batches(
    State(state): State<AppState>,
    Query(params): Query<BatchListParams>,
) -> AppResult<impl IntoResponse> {
    let batches = BatchRepo::list(&state.pool, &params).await?;
    Ok(Json(batches))
}

/// GET /api/v1/batches/{id}
pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = BatchRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| batch_not_found(id))?;
    Ok(Json(detail))
}

/// GET /api/v1/batches/{id}/qr-codes
///
/// Regenerate the codes of an existing batch, in print order.
pub async fn qr_codes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let batch = BatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| batch_not_found(id))?;

    let codes = issue_codes(
        &state.config.public_base_url,
        batch.plant_type_id,
        batch.id,
        batch.initial_quantity,
    )
    .await?;

    Ok(Json(codes))
}

/// GET /api/v1/batches/{id}/movements
pub async fn list_movements(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if BatchRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(batch_not_found(id));
    }
    let movements = BatchRepo::list_movements(&state.pool, id).await?;
    Ok(Json(movements))
}

// ---------------------------------------------------------------------------
// Stock mutations
// ---------------------------------------------------------------------------

/// PUT /api/v1/batches/{id}
///
/// Absolute overwrite of the remaining quantity. The quantity must stay
/// within `0..=initial_quantity`; a supplied status must match it.
pub async fn overwrite_stock(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBatchStock>,
) -> AppResult<impl IntoResponse> {
    let existing = BatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| batch_not_found(id))?;

    let status = inventory::resolve_overwrite(
        input.current_quantity,
        existing.initial_quantity,
        input.status.as_deref(),
    )?;

    let batch = BatchRepo::overwrite_quantity(&state.pool, id, input.current_quantity, status.as_str())
        .await?
        .ok_or_else(|| batch_not_found(id))?;

    tracing::info!(
        batch_id = id,
        previous = existing.current_quantity,
        current = batch.current_quantity,
        status = %batch.status,
        "Batch stock overwritten",
    );

    Ok(Json(batch))
}

/// POST /api/v1/batches/{id}/adjustments
///
/// Apply a signed delta atomically. A refused delta is explained against
/// the batch's current row: 409 when stock would go negative, 400 when it
/// would exceed the initial quantity.
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdjustBatch>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let reason = StockReason::from_str_value(&input.reason)?;
    inventory::validate_delta(input.delta, reason)?;

    let applied =
        BatchRepo::apply_delta(&state.pool, id, input.delta, reason, input.note.as_deref())
            .await?;

    let Some(batch) = applied else {
        let detail = BatchRepo::find_detail(&state.pool, id)
            .await?
            .ok_or_else(|| batch_not_found(id))?;
        inventory::apply_delta(
            &detail.plant_name,
            detail.batch.current_quantity,
            detail.batch.initial_quantity,
            input.delta,
        )?;
        // The guard refused a delta that fits the row as it reads now.
        return Err(AppError::Core(CoreError::Conflict(format!(
            "batch {id} changed while the adjustment was applied, retry"
        ))));
    };

    tracing::info!(
        batch_id = id,
        delta = input.delta,
        reason = reason.as_str(),
        current = batch.current_quantity,
        "Batch stock adjusted",
    );

    Ok(Json(batch))
}
