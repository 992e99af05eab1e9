//! Integration tests for the plant type catalog and the batch store.
//!
//! Exercises `PlantTypeRepo` and `BatchRepo` against a real database:
//! - Create batch sets current = initial and status = available
//! - Listing is joined with plant details, newest first, and filterable
//! - Absolute overwrite records a correction movement
//! - Atomic deltas never leave `0..=initial_quantity`
//! - CHECK constraints reject inconsistent rows written behind the repo's back

use alfirdaws_core::inventory::StockReason;
use alfirdaws_db::models::batch::{BatchListParams, CreateBatch};
use alfirdaws_db::models::plant_type::{CreatePlantType, UpdatePlantType};
use alfirdaws_db::repositories::{BatchRepo, PlantTypeRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_plant_type(name: &str) -> CreatePlantType {
    CreatePlantType {
        name: name.to_string(),
        scientific_name: None,
        category: Some("Indoor".to_string()),
        default_price: Decimal::from(80),
        story: None,
        image_url: None,
    }
}

fn new_batch(plant_type_id: i64, initial_quantity: i32) -> CreateBatch {
    CreateBatch {
        plant_type_id,
        batch_name: None,
        source: "purchased".to_string(),
        initial_quantity,
        cost_per_plant: Decimal::from(50),
        selling_price: Decimal::from(80),
    }
}

async fn seed_plant_type(pool: &PgPool, name: &str) -> i64 {
    PlantTypeRepo::create(pool, &new_plant_type(name))
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Plant types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_plant_types_listed_by_name(pool: PgPool) {
    seed_plant_type(&pool, "Lemon").await;
    seed_plant_type(&pool, "Cactus").await;
    seed_plant_type(&pool, "Ficus").await;

    let names: Vec<String> = PlantTypeRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Cactus", "Ficus", "Lemon"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_plant_type_update_only_touches_given_fields(pool: PgPool) {
    let id = seed_plant_type(&pool, "Ficus").await;

    let updated = PlantTypeRepo::update(
        &pool,
        id,
        &UpdatePlantType {
            story: Some("Guardian of memories".to_string()),
            image_url: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.story.as_deref(), Some("Guardian of memories"));
    assert_eq!(updated.name, "Ficus");
    assert!(updated.image_url.is_none());

    let missing = PlantTypeRepo::update(
        &pool,
        999_999,
        &UpdatePlantType {
            story: None,
            image_url: None,
        },
    )
    .await
    .unwrap();
    assert!(missing.is_none());
    assert!(PlantTypeRepo::exists(&pool, id).await.unwrap());
    assert!(!PlantTypeRepo::exists(&pool, 999_999).await.unwrap());
}

// ---------------------------------------------------------------------------
// Creation and listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_batch_starts_full_and_available(pool: PgPool) {
    let plant_type_id = seed_plant_type(&pool, "Ficus").await;

    let batch = BatchRepo::create(&pool, &new_batch(plant_type_id, 3), "available")
        .await
        .unwrap();

    assert!(batch.id > 0);
    assert_eq!(batch.initial_quantity, 3);
    assert_eq!(batch.current_quantity, 3);
    assert_eq!(batch.status, "available");
    assert_eq!(batch.source, "purchased");

    let listed = BatchRepo::list(&pool, &BatchListParams::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, batch.id);
    assert_eq!(listed[0].plant_name, "Ficus");
    assert_eq!(listed[0].category.as_deref(), Some("Indoor"));
    assert_eq!(listed[0].current_quantity, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_batch_with_unknown_plant_type_fails(pool: PgPool) {
    let result = BatchRepo::create(&pool, &new_batch(424_242, 3), "available").await;
    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_orders_newest_first_and_filters(pool: PgPool) {
    let ficus = seed_plant_type(&pool, "Ficus Benjamina").await;
    let cactus = seed_plant_type(&pool, "Cactus").await;

    let first = BatchRepo::create(&pool, &new_batch(ficus, 2), "available")
        .await
        .unwrap();
    let second = BatchRepo::create(&pool, &new_batch(cactus, 4), "available")
        .await
        .unwrap();
    BatchRepo::apply_delta(&pool, second.id, -4, StockReason::Sale, None)
        .await
        .unwrap()
        .unwrap();

    let all = BatchRepo::list(&pool, &BatchListParams::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let searched = BatchRepo::list(
        &pool,
        &BatchListParams {
            search: Some("benj".to_string()),
            in_stock_only: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, first.id);

    let in_stock = BatchRepo::list(
        &pool,
        &BatchListParams {
            search: None,
            in_stock_only: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(in_stock.len(), 1);
    assert_eq!(in_stock[0].id, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_detail_joins_plant(pool: PgPool) {
    let plant_type_id = seed_plant_type(&pool, "Ficus").await;
    let batch = BatchRepo::create(&pool, &new_batch(plant_type_id, 3), "available")
        .await
        .unwrap();

    let detail = BatchRepo::find_detail(&pool, batch.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.batch.id, batch.id);
    assert_eq!(detail.plant_name, "Ficus");

    assert!(BatchRepo::find_detail(&pool, 999_999).await.unwrap().is_none());
    assert!(BatchRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Quantity mutations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overwrite_records_correction(pool: PgPool) {
    let plant_type_id = seed_plant_type(&pool, "Ficus").await;
    let batch = BatchRepo::create(&pool, &new_batch(plant_type_id, 5), "available")
        .await
        .unwrap();

    let updated = BatchRepo::overwrite_quantity(&pool, batch.id, 0, "sold_out")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.current_quantity, 0);
    assert_eq!(updated.status, "sold_out");
    assert!(updated.updated_at >= batch.updated_at);

    let movements = BatchRepo::list_movements(&pool, batch.id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].delta, -5);
    assert_eq!(movements[0].reason, "correction");
    assert_eq!(movements[0].resulting_quantity, 0);

    assert!(BatchRepo::overwrite_quantity(&pool, 999_999, 1, "available")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_delta_derives_status(pool: PgPool) {
    let plant_type_id = seed_plant_type(&pool, "Ficus").await;
    let batch = BatchRepo::create(&pool, &new_batch(plant_type_id, 3), "available")
        .await
        .unwrap();

    let sold = BatchRepo::apply_delta(&pool, batch.id, -3, StockReason::Loss, Some("frost"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sold.current_quantity, 0);
    assert_eq!(sold.status, "sold_out");

    let restocked = BatchRepo::apply_delta(&pool, batch.id, 1, StockReason::Restock, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restocked.current_quantity, 1);
    assert_eq!(restocked.status, "available");

    let movements = BatchRepo::list_movements(&pool, batch.id).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].reason, "restock");
    assert_eq!(movements[1].reason, "loss");
    assert_eq!(movements[1].note.as_deref(), Some("frost"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_delta_guard_refuses_out_of_range(pool: PgPool) {
    let plant_type_id = seed_plant_type(&pool, "Ficus").await;
    let batch = BatchRepo::create(&pool, &new_batch(plant_type_id, 3), "available")
        .await
        .unwrap();

    let below = BatchRepo::apply_delta(&pool, batch.id, -4, StockReason::Sale, None)
        .await
        .unwrap();
    assert!(below.is_none());

    let above = BatchRepo::apply_delta(&pool, batch.id, 1, StockReason::Restock, None)
        .await
        .unwrap();
    assert!(above.is_none());

    let unchanged = BatchRepo::find_by_id(&pool, batch.id).await.unwrap().unwrap();
    assert_eq!(unchanged.current_quantity, 3);
    assert!(BatchRepo::list_movements(&pool, batch.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_decrements_never_oversell(pool: PgPool) {
    let plant_type_id = seed_plant_type(&pool, "Ficus").await;
    let batch = BatchRepo::create(&pool, &new_batch(plant_type_id, 5), "available")
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..12 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            BatchRepo::apply_delta(&pool, batch.id, -1, StockReason::Sale, None)
                .await
                .unwrap()
                .is_some()
        }));
    }

    let mut applied = 0;
    for handle in handles {
        if handle.await.unwrap() {
            applied += 1;
        }
    }

    assert_eq!(applied, 5, "exactly the available stock should be sold");
    let after = BatchRepo::find_by_id(&pool, batch.id).await.unwrap().unwrap();
    assert_eq!(after.current_quantity, 0);
    assert_eq!(after.status, "sold_out");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_constraints_reject_inconsistent_rows(pool: PgPool) {
    let plant_type_id = seed_plant_type(&pool, "Ficus").await;
    let batch = BatchRepo::create(&pool, &new_batch(plant_type_id, 3), "available")
        .await
        .unwrap();

    let negative = sqlx::query("UPDATE batches SET current_quantity = -1 WHERE id = $1")
        .bind(batch.id)
        .execute(&pool)
        .await;
    assert!(negative.is_err());

    let mismatched = sqlx::query("UPDATE batches SET status = 'sold_out' WHERE id = $1")
        .bind(batch.id)
        .execute(&pool)
        .await;
    assert!(mismatched.is_err());
}
