//! Point-of-sale cart.
//!
//! A [`Cart`] is a per-session value object: it holds a snapshot of each
//! selected batch as it looked when it was added, plus the requested
//! quantity. Snapshots are deliberately not refreshed; the pre-check in
//! [`Cart::checkout_lines`] works against them, and the database applies
//! the authoritative stock guard when the sale is committed.

use std::collections::BTreeMap;

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::inventory::MAX_INITIAL_QUANTITY;
use crate::types::{DbId, Money};

/// Maximum number of distinct batches in one checkout.
pub const MAX_CHECKOUT_LINES: usize = 200;

/// The parts of a batch the cart needs, captured at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    pub batch_id: DbId,
    pub plant_type_id: DbId,
    pub plant_name: String,
    pub selling_price: Money,
    pub current_quantity: i32,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub batch: BatchSnapshot,
    pub quantity: i32,
}

impl CartItem {
    /// `selling_price × quantity`, rounded to cents.
    pub fn line_total(&self) -> Money {
        round_currency(self.batch.selling_price * Money::from(self.quantity))
    }
}

/// A cart line that passed the snapshot pre-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub batch_id: DbId,
    pub plant_name: String,
    pub quantity: i32,
    /// Quantity the batch should be left with, according to the snapshot.
    pub expected_remaining: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of plants across all lines.
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    /// Add one plant from `batch`.
    ///
    /// Rejects an out-of-stock batch without touching the cart. A batch that
    /// is already in the cart has its quantity bumped by one and keeps its
    /// original snapshot.
    pub fn add(&mut self, batch: BatchSnapshot) -> Result<&CartItem, CoreError> {
        if batch.current_quantity <= 0 {
            return Err(CoreError::InsufficientStock {
                item: batch.plant_name,
                requested: 1,
                available: 0,
            });
        }

        let existing = self
            .items
            .iter()
            .position(|i| i.batch.batch_id == batch.batch_id);

        let pos = match existing {
            Some(pos) => {
                let line = &mut self.items[pos];
                if line.quantity >= MAX_INITIAL_QUANTITY {
                    return Err(CoreError::Validation(format!(
                        "a cart line holds at most {MAX_INITIAL_QUANTITY} plants"
                    )));
                }
                line.quantity += 1;
                pos
            }
            None => {
                if self.items.len() >= MAX_CHECKOUT_LINES {
                    return Err(CoreError::Validation(format!(
                        "a cart holds at most {MAX_CHECKOUT_LINES} batches"
                    )));
                }
                self.items.push(CartItem { batch, quantity: 1 });
                self.items.len() - 1
            }
        };
        Ok(&self.items[pos])
    }

    /// Set the quantity of an existing line. Zero removes the line.
    ///
    /// A quantity above the snapshot is accepted here and refused at
    /// checkout; anything above the largest possible batch is refused now.
    pub fn set_quantity(&mut self, batch_id: DbId, quantity: i32) -> Result<(), CoreError> {
        if !(0..=MAX_INITIAL_QUANTITY).contains(&quantity) {
            return Err(CoreError::Validation(format!(
                "quantity must be between 0 and {MAX_INITIAL_QUANTITY}, got {quantity}"
            )));
        }
        let pos = self
            .items
            .iter()
            .position(|i| i.batch.batch_id == batch_id)
            .ok_or(CoreError::NotFound {
                entity: "CartItem",
                id: batch_id,
            })?;

        if quantity == 0 {
            self.items.remove(pos);
        } else {
            self.items[pos].quantity = quantity;
        }
        Ok(())
    }

    /// Remove a line. Returns `true` if it was present.
    pub fn remove(&mut self, batch_id: DbId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.batch.batch_id != batch_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> Money {
        compute_total(&self.items)
    }

    /// Pre-check every line against its snapshot.
    ///
    /// Fails on the first line that would leave its batch negative, naming
    /// the plant. Nothing is mutated either way.
    pub fn checkout_lines(&self) -> Result<Vec<CheckoutLine>, CoreError> {
        if self.items.is_empty() {
            return Err(CoreError::Validation("cart is empty".into()));
        }

        self.items
            .iter()
            .map(|item| {
                let remaining = item.batch.current_quantity - item.quantity;
                if remaining < 0 {
                    return Err(CoreError::InsufficientStock {
                        item: item.batch.plant_name.clone(),
                        requested: item.quantity,
                        available: item.batch.current_quantity,
                    });
                }
                Ok(CheckoutLine {
                    batch_id: item.batch.batch_id,
                    plant_name: item.batch.plant_name.clone(),
                    quantity: item.quantity,
                    expected_remaining: remaining,
                })
            })
            .collect()
    }
}

/// Round a currency amount to cents, halves away from zero.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of `selling_price × quantity` over `items`, rounded to cents.
pub fn compute_total(items: &[CartItem]) -> Money {
    let sum: Money = items
        .iter()
        .map(|i| i.batch.selling_price * Money::from(i.quantity))
        .sum();
    round_currency(sum)
}

/// Merge requested `(batch_id, quantity)` lines so each batch appears once,
/// ordered by batch id.
///
/// Quantities must be positive.
pub fn merge_lines(lines: &[(DbId, i32)]) -> Result<Vec<(DbId, i32)>, CoreError> {
    if lines.is_empty() {
        return Err(CoreError::Validation("checkout needs at least one item".into()));
    }

    let mut merged: BTreeMap<DbId, i32> = BTreeMap::new();
    for &(batch_id, quantity) in lines {
        if quantity <= 0 {
            return Err(CoreError::Validation(format!(
                "quantity for batch {batch_id} must be > 0, got {quantity}"
            )));
        }
        let entry = merged.entry(batch_id).or_insert(0);
        *entry = entry.checked_add(quantity).ok_or_else(|| {
            CoreError::Validation(format!("quantity for batch {batch_id} is too large"))
        })?;
    }

    if merged.len() > MAX_CHECKOUT_LINES {
        return Err(CoreError::Validation(format!(
            "checkout holds at most {MAX_CHECKOUT_LINES} batches"
        )));
    }
    Ok(merged.into_iter().collect())
}
