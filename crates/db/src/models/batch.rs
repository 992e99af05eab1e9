//! Batch (inventory lot) model, list/detail projections, and DTOs.

use alfirdaws_core::inventory::SOURCE_PURCHASED;
use alfirdaws_core::types::{DbId, Money, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Batch {
    pub id: DbId,
    pub plant_type_id: DbId,
    pub batch_name: Option<String>,
    pub source: String,
    pub initial_quantity: i32,
    pub current_quantity: i32,
    pub cost_per_plant: Money,
    pub selling_price: Money,
    pub status: String,
    pub date_received: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A batch joined with its plant name and category, as listed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BatchSummary {
    pub id: DbId,
    pub plant_type_id: DbId,
    pub batch_name: Option<String>,
    pub initial_quantity: i32,
    pub current_quantity: i32,
    pub selling_price: Money,
    pub status: String,
    pub date_received: NaiveDate,
    pub plant_name: String,
    pub category: Option<String>,
}

/// A full batch row joined with plant details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BatchDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub batch: Batch,
    pub plant_name: String,
    pub scientific_name: Option<String>,
    pub category: Option<String>,
}

fn default_source() -> String {
    SOURCE_PURCHASED.to_string()
}

/// DTO for creating a batch. Current quantity and status are derived.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBatch {
    pub plant_type_id: DbId,
    #[validate(length(max = 200))]
    pub batch_name: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    pub initial_quantity: i32,
    pub cost_per_plant: Money,
    pub selling_price: Money,
}

/// DTO for an absolute stock overwrite (`PUT /batches/{id}`).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBatchStock {
    pub current_quantity: i32,
    /// Optional; must agree with `current_quantity` when given.
    pub status: Option<String>,
}

/// DTO for a signed stock adjustment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdjustBatch {
    pub delta: i32,
    pub reason: String,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Query parameters for `GET /batches`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchListParams {
    /// Case-insensitive substring match on the plant name.
    pub search: Option<String>,
    /// Hide batches with no plants left.
    #[serde(default)]
    pub in_stock_only: bool,
}

/// A row from the `stock_movements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockMovement {
    pub id: DbId,
    pub batch_id: DbId,
    pub delta: i32,
    pub reason: String,
    pub resulting_quantity: i32,
    pub note: Option<String>,
    pub created_at: Timestamp,
}
