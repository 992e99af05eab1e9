//! Route definitions for the point of sale.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::pos;
use crate::state::AppState;

/// POS routes mounted at `/pos`.
///
/// ```text
/// POST   /sessions                           -> create_session
/// GET    /sessions/{id}                      -> get_session
/// DELETE /sessions/{id}                      -> close_session
/// POST   /sessions/{id}/items                -> add_item
/// PUT    /sessions/{id}/items/{batch_id}     -> set_item_quantity
/// DELETE /sessions/{id}/items/{batch_id}     -> remove_item
/// POST   /sessions/{id}/checkout             -> checkout_session
/// POST   /checkout                           -> checkout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(pos::create_session))
        .route(
            "/sessions/{id}",
            get(pos::get_session).delete(pos::close_session),
        )
        .route("/sessions/{id}/items", post(pos::add_item))
        .route(
            "/sessions/{id}/items/{batch_id}",
            put(pos::set_item_quantity).delete(pos::remove_item),
        )
        .route("/sessions/{id}/checkout", post(pos::checkout_session))
        .route("/checkout", post(pos::checkout))
}
