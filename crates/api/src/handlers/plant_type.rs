use alfirdaws_core::error::CoreError;
use alfirdaws_core::inventory::validate_amount;
use alfirdaws_core::types::DbId;
use alfirdaws_db::models::plant_type::{CreatePlantType, UpdatePlantType};
use alfirdaws_db::repositories::PlantTypeRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/plant-types
pub async fn create_plant_type(
    State(state): State<AppState>,
    Json(input): Json<CreatePlantType>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be blank".into(),
        )));
    }
    validate_amount(input.default_price, "default_price")?;

    let plant_type = PlantTypeRepo::create(&state.pool, &input).await?;

    tracing::info!(
        plant_type_id = plant_type.id,
        name = %plant_type.name,
        "Plant type created",
    );

    Ok((StatusCode::CREATED, Json(plant_type)))
}

/// GET /api/v1/plant-types
pub async fn list_plant_types(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let plant_types = PlantTypeRepo::list(&state.pool).await?;
    Ok(Json(plant_types))
}

/// GET /api/v1/plant-types/{id}
pub async fn get_plant_type(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let plant_type = PlantTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PlantType",
            id,
        }))?;
    Ok(Json(plant_type))
}

/// PUT /api/v1/plant-types/{id}
///
/// Only the story and image can change; omitted fields keep their value.
pub async fn update_plant_type(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlantType>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let plant_type = PlantTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PlantType",
            id,
        }))?;

    tracing::info!(plant_type_id = id, "Plant type updated");

    Ok(Json(plant_type))
}
