pub mod config;
pub mod error;
pub mod handlers;
pub mod pos;
pub mod router;
pub mod routes;
pub mod state;
