//! Repository for the `plant_types` table.

use alfirdaws_core::types::DbId;
use sqlx::PgPool;

use crate::models::plant_type::{CreatePlantType, PlantType, UpdatePlantType};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, scientific_name, category, default_price, story, image_url, \
    created_at, updated_at";

/// Provides catalog operations for plant types.
pub struct PlantTypeRepo;

impl PlantTypeRepo {
    /// Insert a new plant type, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlantType) -> Result<PlantType, sqlx::Error> {
        let query = format!(
            "INSERT INTO plant_types (name, scientific_name, category, default_price, story, image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlantType>(&query)
            .bind(input.name.trim())
            .bind(&input.scientific_name)
            .bind(&input.category)
            .bind(input.default_price)
            .bind(&input.story)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a plant type by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PlantType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plant_types WHERE id = $1");
        sqlx::query_as::<_, PlantType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all plant types alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<PlantType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plant_types ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, PlantType>(&query).fetch_all(pool).await
    }

    /// Update the story and/or image. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlantType,
    ) -> Result<Option<PlantType>, sqlx::Error> {
        let query = format!(
            "UPDATE plant_types SET
                story = COALESCE($2, story),
                image_url = COALESCE($3, image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlantType>(&query)
            .bind(id)
            .bind(&input.story)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Whether a plant type with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM plant_types WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
