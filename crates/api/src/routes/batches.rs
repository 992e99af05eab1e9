//! Route definitions for batches and their stock history.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::batch;
use crate::state::AppState;

/// Batch routes mounted at `/batches`.
///
/// ```text
/// GET    /                   -> list_batches
/// POST   /                   -> create_batch
/// GET    /{id}               -> get_batch
/// PUT    /{id}               -> overwrite_stock
/// POST   /{id}/adjustments   -> adjust_stock
/// GET    /{id}/movements     -> list_movements
/// GET    /{id}/qr-codes      -> qr_codes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(batch::list_batches).post(batch::create_batch))
        .route("/{id}", get(batch::get_batch).put(batch::overwrite_stock))
        .route("/{id}/adjustments", post(batch::adjust_stock))
        .route("/{id}/movements", get(batch::list_movements))
        .route("/{id}/qr-codes", get(batch::qr_codes))
}
