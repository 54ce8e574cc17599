//! HTTP server layer
//!
//! Axum server with:
//! - Permissive CORS
//! - Request tracing and timeouts
//! - Bearer-token authentication
//! - Redis-backed throttling on selected routes
//! - `{"detail": ...}` JSON error responses

pub mod server;
pub mod error;
pub mod extractors;
pub mod rate_limit;
pub mod routes;

pub use server::{build_router, run_server, serve, ServerConfig};
pub use error::ApiError;
pub use rate_limit::{RateLimiter, Throttle};
