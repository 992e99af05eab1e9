pub mod batch;
pub mod dashboard;
pub mod plant_page;
pub mod plant_type;
pub mod pos;
pub mod sale;
