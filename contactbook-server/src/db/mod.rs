//! Database layer - connection pool, migrations and repositories
//!
//! # Design Principles
//!
//! - Connection pool - each request borrows one connection for its duration
//! - Not-found is `Ok(None)`, never an error
//! - Unique constraints are the source of truth; a violation surfaces as
//!   `DbError::Conflict` even where a handler looked first
//! - Transactions for multi-step operations

pub mod pool;
pub mod migrations;
pub mod repos;

pub use pool::{create_pool, health_probe};
pub use repos::*;
