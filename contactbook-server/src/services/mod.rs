//! Adapters for external collaborators: the avatar image store and mail
//! delivery.

pub mod images;
pub mod mailer;

pub use images::{avatar_public_id, CloudinaryStore, ImageStore};
pub use mailer::{confirmation_link, LogMailer, Mailer};

/// External service error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
}
