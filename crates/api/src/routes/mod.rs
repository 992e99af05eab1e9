pub mod batches;
pub mod dashboard;
pub mod health;
pub mod plant_page;
pub mod plant_types;
pub mod pos;
pub mod sales;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /plant-types                                     list, create
/// /plant-types/{id}                                get, update
///
/// /batches                                         list, create (+ QR codes)
/// /batches/{id}                                    get, overwrite stock
/// /batches/{id}/adjustments                        signed stock delta (POST)
/// /batches/{id}/movements                          stock movement history
/// /batches/{id}/qr-codes                           regenerate QR codes
///
/// /pos/sessions                                    open session (POST)
/// /pos/sessions/{id}                               get cart, close session
/// /pos/sessions/{id}/items                         add one plant (POST)
/// /pos/sessions/{id}/items/{batch_id}              set quantity, remove line
/// /pos/sessions/{id}/checkout                      checkout (POST)
/// /pos/checkout                                    stateless checkout (POST)
///
/// /sales                                           list
/// /sales/{id}                                      get with lines
///
/// /dashboard/summary                               sales and stock summary
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/plant-types", plant_types::router())
        .nest("/batches", batches::router())
        .nest("/pos", pos::router())
        .nest("/sales", sales::router())
        .nest("/dashboard", dashboard::router())
}
