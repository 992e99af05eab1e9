use alfirdaws_core::error::CoreError;
use alfirdaws_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use alfirdaws_core::types::DbId;
use alfirdaws_db::models::sale::SaleListParams;
use alfirdaws_db::repositories::SaleRepo;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/sales
///
/// Newest first, paginated with `?limit=&offset=`.
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<SaleListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let sales = SaleRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(sales))
}

/// GET /api/v1/sales/{id}
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let sale = SaleRepo::find_with_items(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Sale", id }))?;
    Ok(Json(sale))
}
