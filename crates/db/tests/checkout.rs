//! Integration tests for the transactional checkout, the sales ledger, and
//! the dashboard aggregations.

use alfirdaws_db::models::batch::CreateBatch;
use alfirdaws_db::models::plant_type::CreatePlantType;
use alfirdaws_db::models::sale::{CheckoutOutcome, SaleLine};
use alfirdaws_db::repositories::{BatchRepo, DashboardRepo, PlantTypeRepo, SaleRepo};
use assert_matches::assert_matches;
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a plant type and one batch of it, returning the batch id.
async fn seed_batch(pool: &PgPool, name: &str, initial: i32, price: Decimal) -> i64 {
    let plant_type = PlantTypeRepo::create(
        pool,
        &CreatePlantType {
            name: name.to_string(),
            scientific_name: None,
            category: None,
            default_price: price,
            story: None,
            image_url: None,
        },
    )
    .await
    .unwrap();

    BatchRepo::create(
        pool,
        &CreateBatch {
            plant_type_id: plant_type.id,
            batch_name: None,
            source: "grown_in_house".to_string(),
            initial_quantity: initial,
            cost_per_plant: Decimal::from(10),
            selling_price: price,
        },
        "available",
    )
    .await
    .unwrap()
    .id
}

fn line(batch_id: i64, quantity: i32) -> SaleLine {
    SaleLine { batch_id, quantity }
}

async fn current_quantity(pool: &PgPool, batch_id: i64) -> i32 {
    BatchRepo::find_by_id(pool, batch_id)
        .await
        .unwrap()
        .unwrap()
        .current_quantity
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_decrements_and_records_sale(pool: PgPool) {
    let batch_id = seed_batch(&pool, "Ficus", 5, Decimal::new(4550, 2)).await;

    let outcome = SaleRepo::checkout(&pool, &[line(batch_id, 3)]).await.unwrap();
    let sale = assert_matches!(outcome, CheckoutOutcome::Completed(sale) => sale);

    assert_eq!(sale.sale.total_amount, Decimal::new(13650, 2));
    assert_eq!(sale.sale.item_count, 3);
    assert_eq!(sale.items.len(), 1);
    assert_eq!(sale.items[0].plant_name, "Ficus");
    assert_eq!(sale.items[0].unit_price, Decimal::new(4550, 2));
    assert_eq!(sale.items[0].line_total, Decimal::new(13650, 2));

    let batch = BatchRepo::find_by_id(&pool, batch_id).await.unwrap().unwrap();
    assert_eq!(batch.current_quantity, 2);
    assert_eq!(batch.status, "available");

    let movements = BatchRepo::list_movements(&pool, batch_id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].reason, "sale");
    assert_eq!(movements[0].delta, -3);
    assert_eq!(
        movements[0].note.as_deref(),
        Some(format!("sale #{}", sale.sale.id).as_str())
    );

    let stored = SaleRepo::find_with_items(&pool, sale.sale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.items.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_last_units_sells_out(pool: PgPool) {
    let batch_id = seed_batch(&pool, "Ficus", 3, Decimal::from(80)).await;

    let outcome = SaleRepo::checkout(&pool, &[line(batch_id, 3)]).await.unwrap();
    assert_matches!(outcome, CheckoutOutcome::Completed(_));

    let batch = BatchRepo::find_by_id(&pool, batch_id).await.unwrap().unwrap();
    assert_eq!(batch.current_quantity, 0);
    assert_eq!(batch.status, "sold_out");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_short_line_rolls_back_everything(pool: PgPool) {
    let ficus = seed_batch(&pool, "Ficus", 5, Decimal::from(80)).await;
    let cactus = seed_batch(&pool, "Cactus", 1, Decimal::from(40)).await;

    let outcome = SaleRepo::checkout(&pool, &[line(ficus, 2), line(cactus, 2)])
        .await
        .unwrap();
    assert_matches!(
        outcome,
        CheckoutOutcome::InsufficientStock { batch_id, ref plant_name, requested: 2, available: 1 }
            if batch_id == cactus && plant_name == "Cactus"
    );

    assert_eq!(current_quantity(&pool, ficus).await, 5);
    assert_eq!(current_quantity(&pool, cactus).await, 1);
    assert!(SaleRepo::list(&pool, 10, 0).await.unwrap().is_empty());
    assert!(BatchRepo::list_movements(&pool, ficus).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkout_unknown_batch(pool: PgPool) {
    let ficus = seed_batch(&pool, "Ficus", 5, Decimal::from(80)).await;

    let outcome = SaleRepo::checkout(&pool, &[line(ficus, 1), line(999_999, 1)])
        .await
        .unwrap();
    assert_matches!(outcome, CheckoutOutcome::BatchNotFound(999_999));
    assert_eq!(current_quantity(&pool, ficus).await, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_checkouts_sell_last_unit_once(pool: PgPool) {
    let ficus = seed_batch(&pool, "Ficus", 1, Decimal::from(80)).await;
    let cactus = seed_batch(&pool, "Cactus", 10, Decimal::from(40)).await;

    // Opposite line order on each terminal; rows are locked by id either way.
    let a = {
        let pool = pool.clone();
        tokio::spawn(async move {
            SaleRepo::checkout(&pool, &[line(ficus, 1), line(cactus, 1)])
                .await
                .unwrap()
        })
    };
    let b = {
        let pool = pool.clone();
        tokio::spawn(async move {
            SaleRepo::checkout(&pool, &[line(cactus, 1), line(ficus, 1)])
                .await
                .unwrap()
        })
    };

    let outcomes = [a.await.unwrap(), b.await.unwrap()];
    let completed = outcomes
        .iter()
        .filter(|o| matches!(o, CheckoutOutcome::Completed(_)))
        .count();
    let refused = outcomes
        .iter()
        .filter(|o| matches!(o, CheckoutOutcome::InsufficientStock { available: 0, .. }))
        .count();

    assert_eq!(completed, 1);
    assert_eq!(refused, 1);
    assert_eq!(current_quantity(&pool, ficus).await, 0);
    assert_eq!(current_quantity(&pool, cactus).await, 9);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sales_listed_newest_first(pool: PgPool) {
    let batch_id = seed_batch(&pool, "Ficus", 5, Decimal::from(80)).await;

    for _ in 0..3 {
        SaleRepo::checkout(&pool, &[line(batch_id, 1)]).await.unwrap();
    }

    let sales = SaleRepo::list(&pool, 2, 0).await.unwrap();
    assert_eq!(sales.len(), 2);
    assert!(sales[0].id > sales[1].id);

    let rest = SaleRepo::list(&pool, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);

    assert!(SaleRepo::find_with_items(&pool, 999_999)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_empty_store(pool: PgPool) {
    let summary = DashboardRepo::summary(&pool, 5).await.unwrap();

    assert_eq!(summary.sales.sales_today, Decimal::ZERO);
    assert_eq!(summary.sales.sales_count_today, 0);
    assert_eq!(summary.stock.stock_value, Decimal::ZERO);
    assert_eq!(summary.stock.units_in_stock, 0);
    assert!(summary.top_plants.is_empty());
    assert!(summary.recent_sales.is_empty());
    assert!(summary.low_stock.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_aggregates_sales_and_stock(pool: PgPool) {
    let ficus = seed_batch(&pool, "Ficus", 10, Decimal::from(80)).await;
    let cactus = seed_batch(&pool, "Cactus", 6, Decimal::from(40)).await;
    let sold_out = seed_batch(&pool, "Lemon", 1, Decimal::from(30)).await;

    SaleRepo::checkout(&pool, &[line(ficus, 4), line(cactus, 2)])
        .await
        .unwrap();
    SaleRepo::checkout(&pool, &[line(sold_out, 1)]).await.unwrap();

    let summary = DashboardRepo::summary(&pool, 5).await.unwrap();

    // 4 × 80 + 2 × 40 + 30
    assert_eq!(summary.sales.sales_today, Decimal::from(430));
    assert_eq!(summary.sales.sales_week, Decimal::from(430));
    assert_eq!(summary.sales.sales_count_today, 2);

    // 6 × 80 + 4 × 40
    assert_eq!(summary.stock.stock_value, Decimal::from(640));
    assert_eq!(summary.stock.stock_cost, Decimal::from(100));
    assert_eq!(summary.stock.units_in_stock, 10);

    assert_eq!(summary.top_plants[0].plant_name, "Ficus");
    assert_eq!(summary.top_plants[0].total_sold, 4);
    assert_eq!(summary.recent_sales.len(), 3);

    // Sold-out batches are not "low stock".
    let low: Vec<i64> = summary.low_stock.iter().map(|b| b.id).collect();
    assert_eq!(low, vec![cactus]);
}
