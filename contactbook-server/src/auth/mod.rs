//! Authentication primitives - password hashing and signed tokens
//!
//! The HTTP side (the `CurrentUser` extractor and the `/auth` routes) lives in
//! [`crate::http`]; this module knows nothing about requests.

pub mod password;
pub mod tokens;

pub use password::{hash_password, verify_password};
pub use tokens::{Claims, TokenPair, TokenScope, TokenService};

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("token scope mismatch: expected {expected:?}, got {actual:?}")]
    InvalidScope {
        expected: TokenScope,
        actual: TokenScope,
    },

    #[error("password hash error: {0}")]
    PasswordHash(String),
}
