use axum::routing::get;
use axum::Router;

use crate::handlers::sale;
use crate::state::AppState;

/// Sales ledger routes mounted at `/sales`.
///
/// ```text
/// GET    /          -> list_sales
/// GET    /{id}      -> get_sale
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sale::list_sales))
        .route("/{id}", get(sale::get_sale))
}
