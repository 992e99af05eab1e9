//! Sale ledger model and checkout types.

use alfirdaws_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sales` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sale {
    pub id: DbId,
    pub total_amount: Money,
    pub item_count: i32,
    pub created_at: Timestamp,
}

/// A row from the `sale_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SaleItem {
    pub id: DbId,
    pub sale_id: DbId,
    pub batch_id: DbId,
    pub plant_type_id: DbId,
    pub plant_name: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// A sale with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// One requested checkout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SaleLine {
    pub batch_id: DbId,
    pub quantity: i32,
}

/// Query parameters for `GET /sales`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Result of an atomic checkout attempt.
///
/// Anything other than `Completed` means the transaction was rolled back and
/// no batch was touched.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    Completed(SaleWithItems),
    BatchNotFound(DbId),
    InsufficientStock {
        batch_id: DbId,
        plant_name: String,
        requested: i32,
        available: i32,
    },
}
