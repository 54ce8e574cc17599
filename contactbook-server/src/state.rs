//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::config::Settings;
use crate::http::rate_limit::RateLimiter;
use crate::services::{CloudinaryStore, ImageStore, LogMailer, Mailer};

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub settings: Settings,
    pub tokens: TokenService,
    pub limiter: RateLimiter,
    pub images: Arc<dyn ImageStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// State with the production collaborators (Cloudinary, log mailer).
    pub fn new(pool: PgPool, settings: Settings, limiter: RateLimiter) -> Self {
        let images = Arc::new(CloudinaryStore::new(settings.cloudinary.clone()));
        let mailer = Arc::new(LogMailer::new(&settings.mail));
        Self::with_services(pool, settings, limiter, images, mailer)
    }

    pub fn with_services(
        pool: PgPool,
        settings: Settings,
        limiter: RateLimiter,
        images: Arc<dyn ImageStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            tokens: TokenService::new(&settings.jwt),
            pool,
            settings,
            limiter,
            images,
            mailer,
        }
    }
}
