//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Form, FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::auth::TokenScope;
use crate::db::repos::{User, UserRepo};
use crate::models::ValidationError;
use crate::state::AppState;

/// JSON body whose decode failures are reported as 422 `{"detail"}`
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| malformed(e.body_text()))?;
        Ok(Self(value))
    }
}

/// URL-encoded form body, same rejection shape as [`ValidJson`]
pub struct ValidForm<T>(pub T);

impl<S, T> FromRequest<S> for ValidForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e: FormRejection| malformed(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Path parameters; a non-numeric id is a 422, not a plain-text 400
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| malformed(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string; `?limit=abc` is a 422 like any other malformed input
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| malformed(e.body_text()))?;
        Ok(Self(value))
    }
}

fn malformed(message: String) -> ApiError {
    ApiError::Validation(ValidationError::Malformed { message })
}

/// Raw token from `Authorization: Bearer <token>`
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated"))?;
        Ok(Self(token.to_owned()))
    }
}

fn bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authenticated caller, loaded from a valid access token
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::credentials())?;

        let email = state
            .tokens
            .verify(&token, TokenScope::AccessToken)
            .map_err(|e| {
                tracing::warn!("Rejected access token: {}", e);
                ApiError::credentials()
            })?;

        let user = UserRepo::new(&state.pool)
            .get_by_email(&email)
            .await?
            .ok_or_else(ApiError::credentials)?;

        Ok(Self(user))
    }
}
