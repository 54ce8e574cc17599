//! Tag endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::{Tag, TagRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidPath, ValidQuery};
use crate::models::{PaginationParams, TagInput};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 100;

/// Tag response
#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

/// GET /tags
async fn list_tags(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let page = params.with_default_limit(DEFAULT_LIMIT);
    let tags = TagRepo::new(&state.pool).list(page).await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// GET /tags/{id}
async fn get_tag(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = TagRepo::new(&state.pool)
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Tag not found"))?;
    Ok(Json(tag.into()))
}

/// POST /tags
async fn create_tag(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidJson(body): ValidJson<TagInput>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    body.validate()?;
    let tag = TagRepo::new(&state.pool).create(&body).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

/// PUT /tags/{id}
async fn update_tag(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidPath(id): ValidPath<i32>,
    ValidJson(body): ValidJson<TagInput>,
) -> Result<Json<TagResponse>, ApiError> {
    body.validate()?;
    let tag = TagRepo::new(&state.pool)
        .update(id, &body)
        .await?
        .ok_or(ApiError::NotFound("Tag not found"))?;
    Ok(Json(tag.into()))
}

/// DELETE /tags/{id}
async fn delete_tag(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = TagRepo::new(&state.pool)
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound("Tag not found"))?;
    Ok(Json(tag.into()))
}

/// Tag routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", get(get_tag).put(update_tag).delete(delete_tag))
}
