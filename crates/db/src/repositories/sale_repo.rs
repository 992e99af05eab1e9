//! Repository for the `sales` and `sale_items` tables, including the atomic
//! multi-batch checkout.

use alfirdaws_core::cart::round_currency;
use alfirdaws_core::inventory::REASON_SALE;
use alfirdaws_core::types::{DbId, Money};
use sqlx::{FromRow, PgPool};

use crate::models::sale::{CheckoutOutcome, Sale, SaleItem, SaleLine, SaleWithItems};
use crate::repositories::BatchRepo;

const SALE_COLUMNS: &str = "id, total_amount, item_count, created_at";

const ITEM_COLUMNS: &str =
    "id, sale_id, batch_id, plant_type_id, plant_name, quantity, unit_price, line_total";

/// A batch row locked for the duration of a checkout.
#[derive(Debug, FromRow)]
struct LockedBatch {
    id: DbId,
    plant_type_id: DbId,
    current_quantity: i32,
    selling_price: Money,
    plant_name: String,
}

/// Provides checkout and sales history operations.
pub struct SaleRepo;

impl SaleRepo {
    /// Apply every line of a checkout in one transaction and record the sale.
    ///
    /// Batch rows are locked in ascending id order before any change, so two
    /// concurrent checkouts touching the same batches serialize instead of
    /// deadlocking. If any batch is missing or short, nothing is written.
    /// Lines must not repeat a batch id.
    pub async fn checkout(
        pool: &PgPool,
        lines: &[SaleLine],
    ) -> Result<CheckoutOutcome, sqlx::Error> {
        let mut lines = lines.to_vec();
        lines.sort_by_key(|l| l.batch_id);
        let ids: Vec<DbId> = lines.iter().map(|l| l.batch_id).collect();

        let mut tx = pool.begin().await?;

        let locked: Vec<LockedBatch> = sqlx::query_as(
            "SELECT b.id, b.plant_type_id, b.current_quantity, b.selling_price, \
                    p.name AS plant_name
             FROM batches b
             JOIN plant_types p ON p.id = b.plant_type_id
             WHERE b.id = ANY($1)
             ORDER BY b.id
             FOR UPDATE OF b",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        // Authoritative stock check against the locked rows.
        let mut priced = Vec::with_capacity(lines.len());
        for line in &lines {
            let Some(batch) = locked.iter().find(|b| b.id == line.batch_id) else {
                return Ok(CheckoutOutcome::BatchNotFound(line.batch_id));
            };
            if batch.current_quantity < line.quantity {
                return Ok(CheckoutOutcome::InsufficientStock {
                    batch_id: batch.id,
                    plant_name: batch.plant_name.clone(),
                    requested: line.quantity,
                    available: batch.current_quantity,
                });
            }
            let line_total = round_currency(batch.selling_price * Money::from(line.quantity));
            priced.push((line, batch, line_total));
        }

        let total = round_currency(priced.iter().map(|(_, _, t)| *t).sum());
        let units: i32 = lines.iter().map(|l| l.quantity).sum();

        let query = format!(
            "INSERT INTO sales (total_amount, item_count) VALUES ($1, $2) RETURNING {SALE_COLUMNS}"
        );
        let sale = sqlx::query_as::<_, Sale>(&query)
            .bind(total)
            .bind(units)
            .fetch_one(&mut *tx)
            .await?;

        let note = format!("sale #{}", sale.id);
        let mut items = Vec::with_capacity(priced.len());
        for (line, batch, line_total) in priced {
            let remaining: Option<(i32,)> = sqlx::query_as(
                "UPDATE batches SET
                    current_quantity = current_quantity - $2,
                    status = CASE WHEN current_quantity - $2 = 0 THEN 'sold_out' ELSE 'available' END,
                    updated_at = NOW()
                 WHERE id = $1 AND current_quantity >= $2
                 RETURNING current_quantity",
            )
            .bind(line.batch_id)
            .bind(line.quantity)
            .fetch_optional(&mut *tx)
            .await?;

            // Unreachable while the row lock is held.
            let Some((remaining,)) = remaining else {
                return Ok(CheckoutOutcome::InsufficientStock {
                    batch_id: batch.id,
                    plant_name: batch.plant_name.clone(),
                    requested: line.quantity,
                    available: batch.current_quantity,
                });
            };

            BatchRepo::record_movement(
                &mut tx,
                line.batch_id,
                -line.quantity,
                REASON_SALE,
                remaining,
                Some(&note),
            )
            .await?;

            let query = format!(
                "INSERT INTO sale_items
                    (sale_id, batch_id, plant_type_id, plant_name, quantity, unit_price, line_total)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING {ITEM_COLUMNS}"
            );
            let item = sqlx::query_as::<_, SaleItem>(&query)
                .bind(sale.id)
                .bind(line.batch_id)
                .bind(batch.plant_type_id)
                .bind(&batch.plant_name)
                .bind(line.quantity)
                .bind(batch.selling_price)
                .bind(line_total)
                .fetch_one(&mut *tx)
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::debug!(sale_id = sale.id, lines = items.len(), %total, "Checkout committed");
        Ok(CheckoutOutcome::Completed(SaleWithItems { sale, items }))
    }

    /// List sales, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Sale>, sqlx::Error> {
        let query = format!(
            "SELECT {SALE_COLUMNS} FROM sales
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Sale>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a sale with all of its lines.
    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SaleWithItems>, sqlx::Error> {
        let query = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = $1");
        let Some(sale) = sqlx::query_as::<_, Sale>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let query = format!("SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = $1 ORDER BY id");
        let items = sqlx::query_as::<_, SaleItem>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        Ok(Some(SaleWithItems { sale, items }))
    }
}
