//! Plant type (species catalog) model and DTOs.

use alfirdaws_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `plant_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlantType {
    pub id: DbId,
    pub name: String,
    pub scientific_name: Option<String>,
    pub category: Option<String>,
    pub default_price: Money,
    pub story: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new plant type.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlantType {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub scientific_name: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub default_price: Money,
    pub story: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// DTO for editing a plant type. Only the story and image may change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePlantType {
    pub story: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}
