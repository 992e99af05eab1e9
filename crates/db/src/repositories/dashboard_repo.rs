//! Read-only aggregation queries backing the dashboard.

use sqlx::PgPool;

use crate::models::batch::BatchSummary;
use crate::models::dashboard::{DashboardSummary, RecentSale, SalesTotals, StockTotals, TopPlant};
use crate::repositories::batch_repo::SUMMARY_SELECT;

/// Number of best sellers reported.
const TOP_PLANTS_LIMIT: i64 = 5;

/// Number of recent sale lines reported.
const RECENT_SALES_LIMIT: i64 = 10;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Build the full dashboard summary.
    ///
    /// "Today" starts at the database's `CURRENT_DATE`; week and month are
    /// rolling 7 and 30 day windows. Low stock lists available batches with
    /// at most `low_stock_threshold` plants left.
    pub async fn summary(
        pool: &PgPool,
        low_stock_threshold: i32,
    ) -> Result<DashboardSummary, sqlx::Error> {
        let sales = sqlx::query_as::<_, SalesTotals>(
            "SELECT
                COALESCE(SUM(total_amount) FILTER (WHERE created_at >= CURRENT_DATE), 0)
                    AS sales_today,
                COALESCE(SUM(total_amount) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days'), 0)
                    AS sales_week,
                COALESCE(SUM(total_amount) FILTER (WHERE created_at >= NOW() - INTERVAL '30 days'), 0)
                    AS sales_month,
                COUNT(*) FILTER (WHERE created_at >= CURRENT_DATE) AS sales_count_today
             FROM sales",
        )
        .fetch_one(pool)
        .await?;

        let stock = sqlx::query_as::<_, StockTotals>(
            "SELECT
                COALESCE(SUM(current_quantity * selling_price), 0) AS stock_value,
                COALESCE(SUM(current_quantity * cost_per_plant), 0) AS stock_cost,
                COALESCE(SUM(current_quantity), 0)::BIGINT AS units_in_stock
             FROM batches",
        )
        .fetch_one(pool)
        .await?;

        let top_plants = sqlx::query_as::<_, TopPlant>(
            "SELECT p.name AS plant_name, SUM(si.quantity)::BIGINT AS total_sold
             FROM sale_items si
             JOIN plant_types p ON p.id = si.plant_type_id
             GROUP BY p.id, p.name
             ORDER BY total_sold DESC, p.name ASC
             LIMIT $1",
        )
        .bind(TOP_PLANTS_LIMIT)
        .fetch_all(pool)
        .await?;

        let recent_sales = sqlx::query_as::<_, RecentSale>(
            "SELECT s.id AS sale_id, si.plant_name, si.quantity, si.line_total AS total_price,
                    s.created_at AS sold_at
             FROM sale_items si
             JOIN sales s ON s.id = si.sale_id
             ORDER BY s.created_at DESC, si.id DESC
             LIMIT $1",
        )
        .bind(RECENT_SALES_LIMIT)
        .fetch_all(pool)
        .await?;

        let query = format!(
            "{SUMMARY_SELECT}
             WHERE b.status = 'available' AND b.current_quantity <= $1
             ORDER BY b.current_quantity ASC, b.id ASC"
        );
        let low_stock = sqlx::query_as::<_, BatchSummary>(&query)
            .bind(low_stock_threshold)
            .fetch_all(pool)
            .await?;

        Ok(DashboardSummary {
            sales,
            stock,
            top_plants,
            recent_sales,
            low_stock,
        })
    }
}
