//! Current-user endpoints, throttled per client

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    middleware,
    routing::{get, patch},
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::CurrentUser;
use crate::http::rate_limit::{rate_limit, Throttle};
use crate::models::ValidationError;
use crate::services::avatar_public_id;
use crate::state::AppState;

pub const ME_THROTTLE: Throttle = Throttle {
    route: "users_me",
    times: 1,
    window: Duration::from_secs(20),
};

pub const AVATAR_THROTTLE: Throttle = Throttle {
    route: "users_avatar",
    times: 1,
    window: Duration::from_secs(20),
};

/// User response (never includes the password hash or tokens)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            avatar: u.avatar,
        }
    }
}

/// GET /users/me
async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// PATCH /users/avatar - multipart `file`
async fn update_avatar(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| malformed(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("avatar").to_owned();
        let bytes = field.bytes().await.map_err(|e| malformed(e.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        ApiError::Validation(ValidationError::Empty { field: "file" })
    })?;

    let url = state
        .images
        .upload_avatar(&avatar_public_id(&user.email), &file_name, bytes.to_vec())
        .await?;

    let user = UserRepo::new(&state.pool)
        .update_avatar_url(&user.email, Some(&url))
        .await?
        .ok_or_else(ApiError::credentials)?;

    tracing::info!(user_id = user.id, "Avatar updated");
    Ok(Json(user.into()))
}

fn malformed(message: String) -> ApiError {
    ApiError::Validation(ValidationError::Malformed { message })
}

/// User routes; the limiter needs the state up front.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/me",
            get(me).route_layer(middleware::from_fn_with_state(
                (state.clone(), ME_THROTTLE),
                rate_limit,
            )),
        )
        .route(
            "/users/avatar",
            patch(update_avatar).route_layer(middleware::from_fn_with_state(
                (state, AVATAR_THROTTLE),
                rate_limit,
            )),
        )
}
