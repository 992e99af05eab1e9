//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod batch_repo;
pub mod dashboard_repo;
pub mod plant_type_repo;
pub mod sale_repo;

pub use batch_repo::BatchRepo;
pub use dashboard_repo::DashboardRepo;
pub use plant_type_repo::PlantTypeRepo;
pub use sale_repo::SaleRepo;
