//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs, validated with `validator` where the
//!   checks are purely field-level

pub mod batch;
pub mod dashboard;
pub mod plant_type;
pub mod sale;
