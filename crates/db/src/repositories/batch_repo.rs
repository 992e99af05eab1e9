//! Repository for the `batches` and `stock_movements` tables.
//!
//! Every write that changes `current_quantity` also sets `status` from the
//! resulting quantity in the same statement, and appends a stock movement
//! in the same transaction.

use alfirdaws_core::inventory::{StockReason, REASON_CORRECTION};
use alfirdaws_core::search::contains_pattern;
use alfirdaws_core::types::DbId;
use sqlx::PgPool;

use crate::models::batch::{
    Batch, BatchDetail, BatchListParams, BatchSummary, CreateBatch, StockMovement,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, plant_type_id, batch_name, source, initial_quantity, \
    current_quantity, cost_per_plant, selling_price, status, date_received, created_at, updated_at";

/// Same columns, qualified for queries joining `plant_types p`.
const QUALIFIED_COLUMNS: &str = "b.id, b.plant_type_id, b.batch_name, b.source, \
    b.initial_quantity, b.current_quantity, b.cost_per_plant, b.selling_price, b.status, \
    b.date_received, b.created_at, b.updated_at";

/// Projection used by listings.
pub(crate) const SUMMARY_SELECT: &str = "SELECT b.id, b.plant_type_id, b.batch_name, \
    b.initial_quantity, b.current_quantity, b.selling_price, b.status, b.date_received, \
    p.name AS plant_name, p.category \
    FROM batches b JOIN plant_types p ON p.id = b.plant_type_id";

const MOVEMENT_COLUMNS: &str =
    "id, batch_id, delta, reason, resulting_quantity, note, created_at";

/// Provides inventory operations for batches.
pub struct BatchRepo;

impl BatchRepo {
    // ── Creation ─────────────────────────────────────────────────────

    /// Insert a new batch with `current_quantity = initial_quantity`,
    /// received today.
    ///
    /// `status` must already be derived from `initial_quantity`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBatch,
        status: &str,
    ) -> Result<Batch, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let batch = Self::create_in_tx(&mut tx, input, status).await?;
        tx.commit().await?;
        Ok(batch)
    }

    /// Insert a new batch inside an existing transaction, so the caller can
    /// roll it back if follow-up work (QR issuance) fails.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateBatch,
        status: &str,
    ) -> Result<Batch, sqlx::Error> {
        let query = format!(
            "INSERT INTO batches
                (plant_type_id, batch_name, source, initial_quantity, current_quantity,
                 cost_per_plant, selling_price, status, date_received)
             VALUES ($1, $2, $3, $4, $4, $5, $6, $7, CURRENT_DATE)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Batch>(&query)
            .bind(input.plant_type_id)
            .bind(&input.batch_name)
            .bind(&input.source)
            .bind(input.initial_quantity)
            .bind(input.cost_per_plant)
            .bind(input.selling_price)
            .bind(status)
            .fetch_one(&mut **tx)
            .await
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Find a batch by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Batch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM batches WHERE id = $1");
        sqlx::query_as::<_, Batch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a batch with its plant name, scientific name and category.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<BatchDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS}, p.name AS plant_name, p.scientific_name, p.category
             FROM batches b
             JOIN plant_types p ON p.id = b.plant_type_id
             WHERE b.id = $1"
        );
        sqlx::query_as::<_, BatchDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List batches, most recently received first.
    pub async fn list(
        pool: &PgPool,
        params: &BatchListParams,
    ) -> Result<Vec<BatchSummary>, sqlx::Error> {
        let pattern = contains_pattern(params.search.as_deref());
        let query = format!(
            "{SUMMARY_SELECT}
             WHERE ($1::TEXT IS NULL OR p.name ILIKE $1)
               AND (NOT $2 OR b.current_quantity > 0)
             ORDER BY b.date_received DESC, b.id DESC"
        );
        sqlx::query_as::<_, BatchSummary>(&query)
            .bind(pattern)
            .bind(params.in_stock_only)
            .fetch_all(pool)
            .await
    }

    // ── Quantity mutations ───────────────────────────────────────────

    /// Overwrite the quantity and status of a batch, recording the implied
    /// delta as a correction.
    ///
    /// The caller validates the range and status first. Returns `None` if
    /// no row with the given `id` exists.
    pub async fn overwrite_quantity(
        pool: &PgPool,
        id: DbId,
        new_quantity: i32,
        status: &str,
    ) -> Result<Option<Batch>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(i32,)> =
            sqlx::query_as("SELECT current_quantity FROM batches WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((current,)) = current else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE batches SET current_quantity = $2, status = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let batch = sqlx::query_as::<_, Batch>(&query)
            .bind(id)
            .bind(new_quantity)
            .bind(status)
            .fetch_one(&mut *tx)
            .await?;

        let delta = new_quantity - current;
        if delta != 0 {
            Self::record_movement(&mut tx, id, delta, REASON_CORRECTION, new_quantity, None)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(batch))
    }

    /// Atomically apply a signed delta.
    ///
    /// The update only matches while the result stays within
    /// `0..=initial_quantity`, so concurrent callers can never drive a batch
    /// negative. Returns `None` when the row does not exist or the guard
    /// refused the change; the caller tells the two apart.
    pub async fn apply_delta(
        pool: &PgPool,
        id: DbId,
        delta: i32,
        reason: StockReason,
        note: Option<&str>,
    ) -> Result<Option<Batch>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE batches SET
                current_quantity = current_quantity + $2,
                status = CASE WHEN current_quantity + $2 = 0 THEN 'sold_out' ELSE 'available' END,
                updated_at = NOW()
             WHERE id = $1
               AND current_quantity + $2 >= 0
               AND current_quantity + $2 <= initial_quantity
             RETURNING {COLUMNS}"
        );
        let batch = sqlx::query_as::<_, Batch>(&query)
            .bind(id)
            .bind(delta)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref b) = batch {
            Self::record_movement(&mut tx, id, delta, reason.as_str(), b.current_quantity, note)
                .await?;
            tx.commit().await?;
        }
        Ok(batch)
    }

    // ── Movements ────────────────────────────────────────────────────

    /// List a batch's stock movements, newest first.
    pub async fn list_movements(
        pool: &PgPool,
        batch_id: DbId,
    ) -> Result<Vec<StockMovement>, sqlx::Error> {
        let query = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements
             WHERE batch_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, StockMovement>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    /// Append a stock movement within an existing transaction.
    pub(crate) async fn record_movement(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        batch_id: DbId,
        delta: i32,
        reason: &str,
        resulting_quantity: i32,
        note: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO stock_movements (batch_id, delta, reason, resulting_quantity, note)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(batch_id)
        .bind(delta)
        .bind(reason)
        .bind(resulting_quantity)
        .bind(note)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
