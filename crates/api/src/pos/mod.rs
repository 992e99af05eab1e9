//! Server-side point-of-sale sessions.
//!
//! Each open terminal holds one cart in [`PosSessionStore`]; carts that go
//! quiet are dropped by the sweeper started with [`start_sweeper`].

pub mod sessions;
pub mod sweeper;

pub use sessions::{PosSession, PosSessionStore};
pub use sweeper::start_sweeper;
