//! Batch inventory rules: sources, statuses, stock movement reasons, and the
//! quantity arithmetic every mutation path goes through.
//!
//! A batch's status is never chosen by a caller. It is derived from the
//! resulting quantity: `sold_out` iff the batch holds zero plants.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest batch that can be created in one request. Every plant gets its
/// own printed QR label, so this also bounds a single QR issuance run.
pub const MAX_INITIAL_QUANTITY: i32 = 5000;

/// Highest unit price or cost accepted, in whole currency units.
pub const MAX_UNIT_PRICE: i64 = 1_000_000;

/// Batches at or below this many plants are reported as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Valid batch source strings (stored in DB).
pub const SOURCE_PURCHASED: &str = "purchased";
pub const SOURCE_GROWN_IN_HOUSE: &str = "grown_in_house";

/// All valid batch source strings.
pub const VALID_SOURCES: &[&str] = &[SOURCE_PURCHASED, SOURCE_GROWN_IN_HOUSE];

/// Valid batch status strings.
pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_SOLD_OUT: &str = "sold_out";

/// All valid batch status strings.
pub const VALID_STATUSES: &[&str] = &[STATUS_AVAILABLE, STATUS_SOLD_OUT];

/// Valid stock movement reason strings.
pub const REASON_SALE: &str = "sale";
pub const REASON_LOSS: &str = "loss";
pub const REASON_RESTOCK: &str = "restock";
pub const REASON_CORRECTION: &str = "correction";

/// All valid stock movement reason strings.
pub const VALID_REASONS: &[&str] = &[REASON_SALE, REASON_LOSS, REASON_RESTOCK, REASON_CORRECTION];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where the plants in a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchSource {
    Purchased,
    GrownInHouse,
}

impl BatchSource {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            SOURCE_PURCHASED => Ok(Self::Purchased),
            SOURCE_GROWN_IN_HOUSE => Ok(Self::GrownInHouse),
            _ => Err(CoreError::Validation(format!(
                "Invalid source '{s}'. Must be one of: {}",
                VALID_SOURCES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchased => SOURCE_PURCHASED,
            Self::GrownInHouse => SOURCE_GROWN_IN_HOUSE,
        }
    }
}

/// Sale availability of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Available,
    SoldOut,
}

impl BatchStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_AVAILABLE => Ok(Self::Available),
            STATUS_SOLD_OUT => Ok(Self::SoldOut),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => STATUS_AVAILABLE,
            Self::SoldOut => STATUS_SOLD_OUT,
        }
    }

    /// The only status consistent with `quantity` plants on hand.
    pub fn for_quantity(quantity: i32) -> Self {
        if quantity == 0 {
            Self::SoldOut
        } else {
            Self::Available
        }
    }
}

/// Why a batch's quantity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockReason {
    /// Plants sold at the point of sale. Always negative.
    Sale,
    /// Plants that died, were damaged, or went missing. Always negative.
    Loss,
    /// Plants returned to stock (e.g. a refunded sale). Always positive.
    Restock,
    /// Manual count correction. Either sign.
    Correction,
}

impl StockReason {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            REASON_SALE => Ok(Self::Sale),
            REASON_LOSS => Ok(Self::Loss),
            REASON_RESTOCK => Ok(Self::Restock),
            REASON_CORRECTION => Ok(Self::Correction),
            _ => Err(CoreError::Validation(format!(
                "Invalid reason '{s}'. Must be one of: {}",
                VALID_REASONS.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => REASON_SALE,
            Self::Loss => REASON_LOSS,
            Self::Restock => REASON_RESTOCK,
            Self::Correction => REASON_CORRECTION,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the numeric fields of a new batch.
pub fn validate_new_batch(
    initial_quantity: i32,
    cost_per_plant: Money,
    selling_price: Money,
) -> Result<(), CoreError> {
    if initial_quantity < 0 {
        return Err(CoreError::Validation(format!(
            "initial_quantity must be >= 0, got {initial_quantity}"
        )));
    }
    if initial_quantity > MAX_INITIAL_QUANTITY {
        return Err(CoreError::Validation(format!(
            "initial_quantity must be <= {MAX_INITIAL_QUANTITY}, got {initial_quantity}"
        )));
    }
    validate_amount(cost_per_plant, "cost_per_plant")?;
    validate_amount(selling_price, "selling_price")?;
    Ok(())
}

/// Validate that a currency amount lies in `0..=MAX_UNIT_PRICE`.
pub fn validate_amount(amount: Money, name: &str) -> Result<(), CoreError> {
    if amount < Money::ZERO {
        return Err(CoreError::Validation(format!(
            "{name} must be >= 0, got {amount}"
        )));
    }
    if amount > Money::from(MAX_UNIT_PRICE) {
        return Err(CoreError::Validation(format!(
            "{name} must be <= {MAX_UNIT_PRICE}, got {amount}"
        )));
    }
    Ok(())
}

/// Validate an absolute quantity overwrite and resolve the status to store.
///
/// `requested_status` may be omitted, in which case it is derived. An
/// explicit status that contradicts the quantity is rejected.
pub fn resolve_overwrite(
    new_quantity: i32,
    initial_quantity: i32,
    requested_status: Option<&str>,
) -> Result<BatchStatus, CoreError> {
    if !(0..=initial_quantity).contains(&new_quantity) {
        return Err(CoreError::Validation(format!(
            "current_quantity must be between 0 and {initial_quantity}, got {new_quantity}"
        )));
    }

    let derived = BatchStatus::for_quantity(new_quantity);
    if let Some(status) = requested_status {
        let requested = BatchStatus::from_str_value(status)?;
        if requested != derived {
            return Err(CoreError::Validation(format!(
                "status '{status}' contradicts current_quantity {new_quantity}"
            )));
        }
    }
    Ok(derived)
}

/// Check that a signed delta agrees with its reason.
pub fn validate_delta(delta: i32, reason: StockReason) -> Result<(), CoreError> {
    if delta == 0 {
        return Err(CoreError::Validation("delta must not be zero".into()));
    }
    if !(-MAX_INITIAL_QUANTITY..=MAX_INITIAL_QUANTITY).contains(&delta) {
        return Err(CoreError::Validation(format!(
            "delta must be between -{MAX_INITIAL_QUANTITY} and {MAX_INITIAL_QUANTITY}, got {delta}"
        )));
    }
    match reason {
        StockReason::Sale | StockReason::Loss if delta > 0 => Err(CoreError::Validation(format!(
            "a '{}' adjustment must be negative, got {delta}",
            reason.as_str()
        ))),
        StockReason::Restock if delta < 0 => Err(CoreError::Validation(format!(
            "a 'restock' adjustment must be positive, got {delta}"
        ))),
        _ => Ok(()),
    }
}

/// Compute the quantity after applying `delta` to a batch, or explain why
/// the move is not allowed.
///
/// The database applies the same guard atomically; this is used to turn a
/// refused update into the right error for the caller.
pub fn apply_delta(
    item: &str,
    current_quantity: i32,
    initial_quantity: i32,
    delta: i32,
) -> Result<i32, CoreError> {
    let next = current_quantity.checked_add(delta).ok_or_else(|| {
        CoreError::Validation(format!("delta {delta} overflows the batch quantity"))
    })?;

    if next < 0 {
        return Err(CoreError::InsufficientStock {
            item: item.to_string(),
            requested: delta.checked_neg().unwrap_or(i32::MAX),
            available: current_quantity,
        });
    }
    if next > initial_quantity {
        return Err(CoreError::Validation(format!(
            "quantity would exceed the initial quantity of {initial_quantity} (got {next})"
        )));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    // -- enums --

    #[test]
    fn source_round_trips_through_db_string() {
        for s in VALID_SOURCES {
            assert_eq!(BatchSource::from_str_value(s).unwrap().as_str(), *s);
        }
        assert!(BatchSource::from_str_value("stolen").is_err());
    }

    #[test]
    fn status_is_derived_from_quantity() {
        assert_eq!(BatchStatus::for_quantity(0), BatchStatus::SoldOut);
        assert_eq!(BatchStatus::for_quantity(1), BatchStatus::Available);
        assert_eq!(BatchStatus::for_quantity(250), BatchStatus::Available);
    }

    #[test]
    fn unknown_reason_is_rejected() {
        assert!(StockReason::from_str_value("theft").is_err());
        assert_eq!(
            StockReason::from_str_value("loss").unwrap(),
            StockReason::Loss
        );
    }

    // -- validate_new_batch --

    #[test]
    fn new_batch_accepts_zero_quantity() {
        assert!(validate_new_batch(0, Decimal::ZERO, Decimal::ZERO).is_ok());
    }

    #[test]
    fn new_batch_rejects_negative_quantity() {
        let err = validate_new_batch(-1, Decimal::from(50), Decimal::from(80)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn new_batch_rejects_oversized_quantity() {
        assert!(validate_new_batch(MAX_INITIAL_QUANTITY + 1, Decimal::ONE, Decimal::ONE).is_err());
        assert!(validate_new_batch(MAX_INITIAL_QUANTITY, Decimal::ONE, Decimal::ONE).is_ok());
    }

    #[test]
    fn new_batch_rejects_negative_prices() {
        assert!(validate_new_batch(3, Decimal::from(-1), Decimal::from(80)).is_err());
        assert!(validate_new_batch(3, Decimal::from(50), Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn amounts_above_max_unit_price_are_rejected() {
        assert!(validate_amount(Decimal::from(MAX_UNIT_PRICE), "selling_price").is_ok());
        assert!(validate_amount(Decimal::new(100_000_001, 2), "selling_price").is_err());
        assert!(validate_new_batch(3, Decimal::from(50), Decimal::from(1_000_000_000)).is_err());
    }

    // -- resolve_overwrite --

    #[test]
    fn overwrite_derives_status_when_omitted() {
        assert_eq!(resolve_overwrite(0, 5, None).unwrap(), BatchStatus::SoldOut);
        assert_eq!(resolve_overwrite(2, 5, None).unwrap(), BatchStatus::Available);
    }

    #[test]
    fn overwrite_rejects_out_of_range_quantity() {
        assert!(resolve_overwrite(-1, 5, None).is_err());
        assert!(resolve_overwrite(6, 5, None).is_err());
    }

    #[test]
    fn overwrite_rejects_contradicting_status() {
        assert!(resolve_overwrite(0, 5, Some("available")).is_err());
        assert!(resolve_overwrite(3, 5, Some("sold_out")).is_err());
        assert!(resolve_overwrite(3, 5, Some("available")).is_ok());
    }

    // -- deltas --

    #[test]
    fn delta_sign_must_match_reason() {
        assert!(validate_delta(0, StockReason::Correction).is_err());
        assert!(validate_delta(2, StockReason::Sale).is_err());
        assert!(validate_delta(2, StockReason::Loss).is_err());
        assert!(validate_delta(-2, StockReason::Restock).is_err());
        assert!(validate_delta(-2, StockReason::Correction).is_ok());
        assert!(validate_delta(2, StockReason::Correction).is_ok());
    }

    #[test]
    fn apply_delta_never_goes_negative() {
        let err = apply_delta("Ficus", 5, 10, -6).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                item,
                requested,
                available,
            } => {
                assert_eq!(item, "Ficus");
                assert_eq!(requested, 6);
                assert_eq!(available, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(apply_delta("Ficus", 5, 10, -5).unwrap(), 0);
    }

    #[test]
    fn apply_delta_never_exceeds_initial_quantity() {
        assert!(apply_delta("Ficus", 9, 10, 2).is_err());
        assert_eq!(apply_delta("Ficus", 9, 10, 1).unwrap(), 10);
    }

    #[test]
    fn delta_beyond_any_batch_is_rejected() {
        assert!(validate_delta(i32::MIN, StockReason::Loss).is_err());
        assert!(validate_delta(i32::MAX, StockReason::Restock).is_err());
        assert!(validate_delta(-MAX_INITIAL_QUANTITY - 1, StockReason::Correction).is_err());
        assert!(validate_delta(-MAX_INITIAL_QUANTITY, StockReason::Loss).is_ok());
    }

    #[test]
    fn apply_delta_explains_extreme_negative_delta() {
        let err = apply_delta("Ficus", 3, 5, i32::MIN).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                requested: i32::MAX,
                available: 3,
                ..
            }
        ));
    }
}
