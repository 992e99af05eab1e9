use axum::routing::get;
use axum::Router;

use crate::handlers::plant_page;
use crate::state::AppState;

/// Mount the public plant story page (root-level, NOT under `/api/v1`).
///
/// This is the URL encoded in every printed QR label.
pub fn router() -> Router<AppState> {
    Router::new().route("/plant/{id}", get(plant_page::show_plant))
}
