//! Domain types and pure logic for the Alfirdaws nursery backend.
//!
//! Nothing in this crate touches the database or the network: inventory
//! rules, QR issuance, the point-of-sale cart and the public plant page
//! renderer are all plain functions over plain data.

pub mod cart;
pub mod error;
pub mod inventory;
pub mod plant_page;
pub mod qr;
pub mod search;
pub mod types;
