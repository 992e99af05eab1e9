//! Point-of-sale handlers.
//!
//! Carts live in the in-process [`PosSessionStore`](crate::pos::PosSessionStore).
//! Adding an item snapshots the batch as it reads at that moment; checkout
//! pre-checks against those snapshots and then hands the lines to
//! [`SaleRepo::checkout`], which applies them in a single transaction.

use alfirdaws_core::cart::{merge_lines, BatchSnapshot, Cart};
use alfirdaws_core::error::CoreError;
use alfirdaws_core::types::{DbId, Money};
use alfirdaws_db::models::sale::{CheckoutOutcome, SaleLine, SaleWithItems};
use alfirdaws_db::repositories::{BatchRepo, SaleRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub batch_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

/// One line of a client-held cart.
#[derive(Debug, Deserialize)]
pub struct CheckoutItemRequest {
    pub batch_id: DbId,
    pub quantity: i32,
    /// Stock the client saw when the line was added. When given, the line is
    /// pre-checked against it before the database is touched.
    pub snapshot_quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub batch_id: DbId,
    pub plant_type_id: DbId,
    pub plant_name: String,
    pub selling_price: Money,
    /// Stock at the time the line was added.
    pub available: i32,
    pub quantity: i32,
    pub line_total: Money,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub session_id: Uuid,
    pub items: Vec<CartLineView>,
    pub unit_count: i64,
    pub total: Money,
}

impl CartView {
    fn new(session_id: Uuid, cart: &Cart) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|item| CartLineView {
                batch_id: item.batch.batch_id,
                plant_type_id: item.batch.plant_type_id,
                plant_name: item.batch.plant_name.clone(),
                selling_price: item.batch.selling_price,
                available: item.batch.current_quantity,
                quantity: item.quantity,
                line_total: item.line_total(),
            })
            .collect();
        Self {
            session_id,
            items,
            unit_count: cart.unit_count(),
            total: cart.total(),
        }
    }
}

/// A committed sale and the amount charged.
#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    pub sale: SaleWithItems,
    pub total: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("POS session {id} not found"))
}

/// Run the transactional checkout and translate a refusal into an error.
async fn commit_sale(state: &AppState, lines: &[SaleLine]) -> AppResult<CheckoutReceipt> {
    match SaleRepo::checkout(&state.pool, lines).await? {
        CheckoutOutcome::Completed(sale) => {
            let total = sale.sale.total_amount;
            Ok(CheckoutReceipt { sale, total })
        }
        CheckoutOutcome::BatchNotFound(id) => {
            Err(AppError::Core(CoreError::NotFound { entity: "Batch", id }))
        }
        CheckoutOutcome::InsufficientStock {
            batch_id,
            plant_name,
            requested,
            available,
        } => {
            tracing::info!(batch_id, requested, available, "Checkout refused, stock changed");
            Err(AppError::Core(CoreError::InsufficientStock {
                item: plant_name,
                requested,
                available,
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// POST /api/v1/pos/sessions
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let id = state.pos_sessions.create().await;
    tracing::info!(session_id = %id, "POS session opened");
    Ok((StatusCode::CREATED, Json(CartView::new(id, &Cart::new()))))
}

/// GET /api/v1/pos/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .pos_sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(CartView::new(id, &session.cart)))
}

/// DELETE /api/v1/pos/sessions/{id}
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.pos_sessions.remove(id).await {
        return Err(session_not_found(id));
    }
    tracing::info!(session_id = %id, "POS session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/pos/sessions/{id}/items
///
/// Add one plant from a batch. Rejected with 409 when the batch is out of
/// stock; the cart is left unchanged.
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddItemRequest>,
) -> AppResult<impl IntoResponse> {
    if state.pos_sessions.get(id).await.is_none() {
        return Err(session_not_found(id));
    }

    let detail = BatchRepo::find_detail(&state.pool, input.batch_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Batch",
            id: input.batch_id,
        }))?;

    let snapshot = BatchSnapshot {
        batch_id: detail.batch.id,
        plant_type_id: detail.batch.plant_type_id,
        plant_name: detail.plant_name,
        selling_price: detail.batch.selling_price,
        current_quantity: detail.batch.current_quantity,
    };

    let view = state
        .pos_sessions
        .with_cart(id, |cart| {
            cart.add(snapshot)?;
            Ok::<_, CoreError>(CartView::new(id, cart))
        })
        .await
        .ok_or_else(|| session_not_found(id))??;

    tracing::debug!(session_id = %id, batch_id = input.batch_id, "Item added to cart");

    Ok(Json(view))
}

/// PUT /api/v1/pos/sessions/{id}/items/{batch_id}
///
/// Set a line's quantity. Zero removes the line.
pub async fn set_item_quantity(
    State(state): State<AppState>,
    Path((id, batch_id)): Path<(Uuid, DbId)>,
    Json(input): Json<SetQuantityRequest>,
) -> AppResult<impl IntoResponse> {
    let view = state
        .pos_sessions
        .with_cart(id, |cart| {
            cart.set_quantity(batch_id, input.quantity)?;
            Ok::<_, CoreError>(CartView::new(id, cart))
        })
        .await
        .ok_or_else(|| session_not_found(id))??;
    Ok(Json(view))
}

/// DELETE /api/v1/pos/sessions/{id}/items/{batch_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, batch_id)): Path<(Uuid, DbId)>,
) -> AppResult<impl IntoResponse> {
    let view = state
        .pos_sessions
        .with_cart(id, |cart| {
            if !cart.remove(batch_id) {
                return Err(CoreError::NotFound {
                    entity: "CartItem",
                    id: batch_id,
                });
            }
            Ok(CartView::new(id, cart))
        })
        .await
        .ok_or_else(|| session_not_found(id))??;
    Ok(Json(view))
}

/// POST /api/v1/pos/sessions/{id}/checkout
///
/// Sell everything in the session's cart. On success the cart is cleared;
/// on any refusal it is left as it was. While the sale is being committed
/// the session refuses edits and a second checkout with 409.
pub async fn checkout_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let cart = state
        .pos_sessions
        .begin_checkout(id)
        .await
        .ok_or_else(|| session_not_found(id))??;

    // Detached so the session is released even if the request is dropped.
    let task_state = state.clone();
    let receipt = tokio::spawn(async move {
        let result = sell_cart(&task_state, &cart).await;
        task_state
            .pos_sessions
            .finish_checkout(id, result.is_ok())
            .await;
        result
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Checkout task failed: {e}")))??;

    tracing::info!(
        session_id = %id,
        sale_id = receipt.sale.sale.id,
        lines = receipt.sale.items.len(),
        total = %receipt.total,
        "POS checkout completed",
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn sell_cart(state: &AppState, cart: &Cart) -> AppResult<CheckoutReceipt> {
    let lines: Vec<SaleLine> = cart
        .checkout_lines()?
        .into_iter()
        .map(|line| SaleLine {
            batch_id: line.batch_id,
            quantity: line.quantity,
        })
        .collect();

    commit_sale(state, &lines).await
}

// ---------------------------------------------------------------------------
// Stateless checkout
// ---------------------------------------------------------------------------

/// POST /api/v1/pos/checkout
///
/// Checkout for clients that keep their own cart. Repeated batch ids are
/// merged into one line.
pub async fn checkout(
    State(state): State<AppState>,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    let pairs: Vec<(DbId, i32)> = input
        .items
        .iter()
        .map(|item| (item.batch_id, item.quantity))
        .collect();
    let merged = merge_lines(&pairs)?;

    for &(batch_id, quantity) in &merged {
        let snapshot = input
            .items
            .iter()
            .filter(|item| item.batch_id == batch_id)
            .filter_map(|item| item.snapshot_quantity)
            .min();
        if let Some(available) = snapshot {
            if available < quantity {
                return Err(AppError::Core(CoreError::InsufficientStock {
                    item: format!("batch #{batch_id}"),
                    requested: quantity,
                    available,
                }));
            }
        }
    }

    let lines: Vec<SaleLine> = merged
        .into_iter()
        .map(|(batch_id, quantity)| SaleLine { batch_id, quantity })
        .collect();

    let receipt = commit_sale(&state, &lines).await?;

    tracing::info!(
        sale_id = receipt.sale.sale.id,
        lines = lines.len(),
        total = %receipt.total,
        "Checkout completed",
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}
