//! Public plant story page, reached by scanning a QR label.
//!
//! Responses are HTML, including the error pages.

use alfirdaws_core::plant_page::{render_not_found, render_plant_page, render_server_error, PlantPage};
use alfirdaws_core::types::DbId;
use alfirdaws_db::repositories::PlantTypeRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::state::AppState;

/// Scan context carried by the QR URL. Malformed values are ignored rather
/// than rejected, since labels are printed and cannot be fixed.
#[derive(Debug, Default, Deserialize)]
pub struct ScanParams {
    pub batch: Option<String>,
    pub plant: Option<String>,
}

/// GET /plant/{id}?batch=&plant=
///
/// A non-numeric id gets the HTML not-found page like any unknown plant.
pub async fn show_plant(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<ScanParams>,
) -> Response {
    let nursery = state.config.nursery_name.as_str();

    let Ok(id) = raw_id.trim().parse::<DbId>() else {
        return (StatusCode::NOT_FOUND, Html(render_not_found(nursery))).into_response();
    };

    let plant_type = match PlantTypeRepo::find_by_id(&state.pool, id).await {
        Ok(Some(plant_type)) => plant_type,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Html(render_not_found(nursery))).into_response();
        }
        Err(e) => {
            tracing::error!(plant_type_id = id, error = %e, "Failed to load plant page");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_server_error(nursery)),
            )
                .into_response();
        }
    };

    let batch = params.batch.as_deref().and_then(|s| s.trim().parse().ok());
    let plant = params.plant.as_deref().and_then(|s| s.trim().parse().ok());

    let html = render_plant_page(&PlantPage {
        nursery_name: nursery,
        name: &plant_type.name,
        scientific_name: plant_type.scientific_name.as_deref(),
        category: plant_type.category.as_deref(),
        story: plant_type.story.as_deref(),
        image_url: plant_type.image_url.as_deref(),
        batch,
        plant,
    });

    Html(html).into_response()
}
