//! API error types with IntoResponse
//!
//! Every error body is `{"detail": ...}`. Infrastructure failures are logged
//! and answered with a generic message.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::repos::DbError;
use crate::models::ValidationError;
use crate::services::ServiceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request shape rejected (422)
    Validation(ValidationError),

    /// Well-formed but unacceptable request (400)
    BadRequest(&'static str),

    /// Missing or bad credentials (401)
    Unauthorized(&'static str),

    /// Resource not found (404), e.g. "Contact not found"
    NotFound(&'static str),

    /// Unique constraint violated (409)
    Conflict(&'static str),

    /// Throttled (429)
    TooManyRequests,

    /// 500 with a caller-visible explanation
    Unhealthy(&'static str),

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn credentials() -> Self {
        Self::Unauthorized("Could not validate credentials")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Unhealthy(_) | Self::Database(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Unhealthy(m) => (*m).to_owned(),
            Self::TooManyRequests => "Too Many Requests".to_owned(),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "Internal server error".to_owned()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                "Internal server error".to_owned()
            }
        };

        let body = Json(json!({ "detail": detail }));
        if let Self::Unauthorized(_) = self {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }
        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conflict { constraint } => Self::Conflict(conflict_detail(&constraint)),
            _ => Self::Database(e),
        }
    }
}

impl From<redis::RedisError> for ApiError {
    fn from(e: redis::RedisError) -> Self {
        Self::Internal {
            message: format!("rate-limit store: {}", e),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Internal {
            message: e.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::PasswordHash(message) => Self::Internal { message },
            _ => Self::credentials(),
        }
    }
}

fn conflict_detail(constraint: &str) -> &'static str {
    match constraint {
        "users_email_key" => "Account already exists",
        "contacts_email_key" => "Contact with this email already exists",
        "tags_name_key" => "Tag already exists",
        _ => "Resource already exists",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn detail(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["detail"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn validation_error_is_422() {
        let err = ApiError::Validation(ValidationError::Empty { field: "name" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail(response).await, "name cannot be empty");
    }

    #[tokio::test]
    async fn not_found_is_404_with_detail() {
        let response = ApiError::NotFound("Tag not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(detail(response).await, "Tag not found");
    }

    #[tokio::test]
    async fn unauthorized_carries_bearer_challenge() {
        let response = ApiError::credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        assert_eq!(detail(response).await, "Could not validate credentials");
    }

    #[tokio::test]
    async fn conflicts_are_phrased_by_constraint() {
        let err = ApiError::from(DbError::Conflict {
            constraint: "users_email_key".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(detail(response).await, "Account already exists");

        let err = ApiError::from(DbError::Conflict {
            constraint: "tags_name_key".into(),
        });
        assert_eq!(detail(err.into_response()).await, "Tag already exists");
    }

    #[tokio::test]
    async fn database_errors_are_generic_500() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail(response).await, "Internal server error");
    }

    #[tokio::test]
    async fn throttled_is_429() {
        let response = ApiError::TooManyRequests.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(detail(response).await, "Too Many Requests");
    }
}
