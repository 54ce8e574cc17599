//! contactbook-server: contacts, notes and tags over HTTP
//!
//! Per-user contact book with a shared note/tag catalogue, JWT
//! authentication, avatar uploads and Redis-backed throttling.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod state;

pub use config::Settings;
pub use error::{Error, Result};
pub use http::{serve, ServerConfig};
pub use state::AppState;
