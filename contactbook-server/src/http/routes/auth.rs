//! Account endpoints: signup, login, token refresh and email confirmation

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::HOST, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};

use super::health::MessageResponse;
use super::users::UserResponse;
use crate::auth::{hash_password, verify_password, TokenPair, TokenScope};
use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{BearerToken, ValidForm, ValidJson, ValidPath};
use crate::models::{Email, LoginForm, RequestEmail, UserSignup, ValidationError};
use crate::state::AppState;

/// Origin the client used to reach us, for links in outgoing mail.
fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost:8000");
    format!("http://{}/", host)
}

/// Issue an email token and hand the confirmation mail to the mailer in the
/// background. Delivery failures are logged, never surfaced to the caller.
fn queue_confirmation(state: &Arc<AppState>, user: &User, base_url: String) -> Result<(), ApiError> {
    let token = state.tokens.issue(&user.email, TokenScope::EmailToken)?;
    let to = Email::new(&user.email, usize::MAX)?;
    let username = user.username.clone();
    let mailer = state.mailer.clone();

    tokio::spawn(async move {
        if let Err(e) = mailer
            .send_confirmation(&to, &username, &base_url, &token)
            .await
        {
            tracing::warn!(to = %to, "Confirmation mail failed: {}", e);
        }
    });
    Ok(())
}

/// POST /auth/signup
async fn signup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidJson(body): ValidJson<UserSignup>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let email = body.validate()?;
    let users = UserRepo::new(&state.pool);

    if users.get_by_email(email.as_str()).await?.is_some() {
        return Err(ApiError::Conflict("Account already exists"));
    }

    let password_hash = hash_password(&body.password)?;
    // A concurrent signup still trips users_email_key -> 409
    let user = users.create(&body.username, &email, &password_hash).await?;
    tracing::info!(user_id = user.id, "Account created");

    queue_confirmation(&state, &user, base_url(&headers))?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login - form `username` (email) + `password`
async fn login(
    State(state): State<Arc<AppState>>,
    ValidForm(form): ValidForm<LoginForm>,
) -> Result<Json<TokenPair>, ApiError> {
    let users = UserRepo::new(&state.pool);

    let user = users
        .get_by_email(&form.username)
        .await?
        .ok_or(ApiError::Unauthorized("Invalid email"))?;
    if !user.confirmed {
        return Err(ApiError::Unauthorized("Email not confirmed"));
    }
    if !verify_password(&form.password, &user.password)? {
        tracing::warn!(user_id = user.id, "Login with wrong password");
        return Err(ApiError::Unauthorized("Invalid password"));
    }

    let pair = state.tokens.issue_pair(&user.email)?;
    users.update_token(user.id, Some(&pair.refresh_token)).await?;
    Ok(Json(pair))
}

/// GET /auth/refresh_token - Bearer refresh token
async fn refresh_token(
    State(state): State<Arc<AppState>>,
    BearerToken(token): BearerToken,
) -> Result<Json<TokenPair>, ApiError> {
    let email = state.tokens.verify(&token, TokenScope::RefreshToken)?;
    let users = UserRepo::new(&state.pool);

    let user = users
        .get_by_email(&email)
        .await?
        .ok_or_else(ApiError::credentials)?;

    if user.refresh_token.as_deref() != Some(token.as_str()) {
        users.update_token(user.id, None).await?;
        tracing::warn!(user_id = user.id, "Stale refresh token presented, session revoked");
        return Err(ApiError::Unauthorized("Invalid refresh token"));
    }

    let pair = state.tokens.issue_pair(&user.email)?;
    users.update_token(user.id, Some(&pair.refresh_token)).await?;
    Ok(Json(pair))
}

/// GET /auth/confirmed_email/{token}
async fn confirmed_email(
    State(state): State<Arc<AppState>>,
    ValidPath(token): ValidPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = state
        .tokens
        .verify(&token, TokenScope::EmailToken)
        .map_err(|_| {
            ApiError::Validation(ValidationError::Malformed {
                message: "Invalid token for email verification".to_owned(),
            })
        })?;

    let users = UserRepo::new(&state.pool);
    let user = users
        .get_by_email(&email)
        .await?
        .ok_or(ApiError::BadRequest("Verification error"))?;

    if user.confirmed {
        return Ok(MessageResponse::json("Your email is already confirmed"));
    }
    users.confirm_email(&email).await?;
    tracing::info!(user_id = user.id, "Email confirmed");
    Ok(MessageResponse::json("Email confirmed"))
}

/// POST /auth/request_email - resend the confirmation mail
async fn request_email(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidJson(body): ValidJson<RequestEmail>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = body.validate()?;
    let user = UserRepo::new(&state.pool)
        .get_by_email(email.as_str())
        .await?;

    match user {
        Some(user) if user.confirmed => {
            Ok(MessageResponse::json("Your email is already confirmed"))
        }
        Some(user) => {
            queue_confirmation(&state, &user, base_url(&headers))?;
            Ok(MessageResponse::json("Check your email for confirmation."))
        }
        // Same answer for unknown addresses
        None => Ok(MessageResponse::json("Check your email for confirmation.")),
    }
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh_token", get(refresh_token))
        .route("/auth/confirmed_email/{token}", get(confirmed_email))
        .route("/auth/request_email", post(request_email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn base_url_from_host_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(base_url(&headers), "http://localhost:8000/");

        headers.insert(HOST, HeaderValue::from_static("contacts.example.com"));
        assert_eq!(base_url(&headers), "http://contacts.example.com/");
    }
}
