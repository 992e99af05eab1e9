use alfirdaws_core::inventory::LOW_STOCK_THRESHOLD;
use alfirdaws_db::repositories::DashboardRepo;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = DashboardRepo::summary(&state.pool, LOW_STOCK_THRESHOLD).await?;
    Ok(Json(summary))
}
