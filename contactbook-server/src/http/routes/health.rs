//! Liveness and database health endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::health_probe;
use crate::http::error::ApiError;
use crate::state::AppState;

/// Plain `{"message": ...}` body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn json(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// GET /
async fn index() -> Json<MessageResponse> {
    MessageResponse::json("Contacts Application")
}

/// GET /api/healthechecker - run `SELECT 1`
async fn healthchecker(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    match health_probe(&state.pool).await {
        Ok(true) => Ok(MessageResponse::json("Database connection is healthy")),
        Ok(false) => Err(ApiError::Unhealthy("Database is not configured correctly")),
        Err(e) => {
            tracing::error!("Health probe failed: {}", e);
            Err(ApiError::Unhealthy("Error connecting to the database"))
        }
    }
}

/// `/` route (mounted at the root)
pub fn root_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(index))
}

/// Health routes (mounted under `/api`)
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/healthechecker", get(healthchecker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn index_names_the_app() {
        let Json(body) = index().await;
        assert_eq!(body.message, "Contacts Application");
    }
}
