use axum::routing::get;
use axum::Router;

use crate::handlers::plant_type;
use crate::state::AppState;

/// Plant type routes mounted at `/plant-types`.
///
/// ```text
/// GET    /          -> list_plant_types
/// POST   /          -> create_plant_type
/// GET    /{id}      -> get_plant_type
/// PUT    /{id}      -> update_plant_type
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(plant_type::list_plant_types).post(plant_type::create_plant_type),
        )
        .route(
            "/{id}",
            get(plant_type::get_plant_type).put(plant_type::update_plant_type),
        )
}
