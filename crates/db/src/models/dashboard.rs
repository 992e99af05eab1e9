//! Read-only dashboard projections over the sales ledger and inventory.

use alfirdaws_core::types::{DbId, Money, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::batch::BatchSummary;

/// Revenue totals over rolling periods.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SalesTotals {
    pub sales_today: Money,
    pub sales_week: Money,
    pub sales_month: Money,
    pub sales_count_today: i64,
}

/// Value of the plants currently on hand.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockTotals {
    pub stock_value: Money,
    pub stock_cost: Money,
    pub units_in_stock: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopPlant {
    pub plant_name: String,
    pub total_sold: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentSale {
    pub sale_id: DbId,
    pub plant_name: String,
    pub quantity: i32,
    pub total_price: Money,
    pub sold_at: Timestamp,
}

/// Everything the dashboard screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    #[serde(flatten)]
    pub sales: SalesTotals,
    #[serde(flatten)]
    pub stock: StockTotals,
    pub top_plants: Vec<TopPlant>,
    pub recent_sales: Vec<RecentSale>,
    pub low_stock: Vec<BatchSummary>,
}
