//! Note endpoints
//!
//! Notes carry their tags; create and update take tag ids and silently drop
//! ids that don't resolve.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::tags::TagResponse;
use crate::db::repos::{Note, NoteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidPath, ValidQuery};
use crate::models::{NoteCreate, NoteStatusUpdate, NoteUpdate, PaginationParams};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 10;

/// Note response
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub created_at: String,
    pub tags: Vec<TagResponse>,
}

impl From<Note> for NoteResponse {
    fn from(n: Note) -> Self {
        Self {
            id: n.id,
            title: n.title,
            description: n.description,
            done: n.done,
            created_at: n.created_at.to_rfc3339(),
            tags: n.tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

pub(crate) fn note_list(notes: Vec<Note>) -> Json<Vec<NoteResponse>> {
    Json(notes.into_iter().map(NoteResponse::from).collect())
}

/// GET /notes
async fn list_notes(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let page = params.with_default_limit(DEFAULT_LIMIT);
    let notes = NoteRepo::new(&state.pool).list(page).await?;
    Ok(note_list(notes))
}

/// GET /notes/{id}
async fn get_note(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = NoteRepo::new(&state.pool)
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Note not found"))?;
    Ok(Json(note.into()))
}

/// POST /notes
async fn create_note(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidJson(body): ValidJson<NoteCreate>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    body.validate()?;
    let note = NoteRepo::new(&state.pool).create(&body).await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}

/// PUT /notes/{id} - full update, tag set replaced
async fn update_note(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidPath(id): ValidPath<i32>,
    ValidJson(body): ValidJson<NoteUpdate>,
) -> Result<Json<NoteResponse>, ApiError> {
    body.validate()?;
    let note = NoteRepo::new(&state.pool)
        .update(id, &body)
        .await?
        .ok_or(ApiError::NotFound("Note not found"))?;
    Ok(Json(note.into()))
}

/// PATCH /notes/{id} - done flag only
async fn update_note_status(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidPath(id): ValidPath<i32>,
    ValidJson(body): ValidJson<NoteStatusUpdate>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = NoteRepo::new(&state.pool)
        .update_status(id, body)
        .await?
        .ok_or(ApiError::NotFound("Note not found"))?;
    Ok(Json(note.into()))
}

/// DELETE /notes/{id}
async fn delete_note(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = NoteRepo::new(&state.pool)
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound("Note not found"))?;
    Ok(Json(note.into()))
}

/// Note routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note)
                .put(update_note)
                .patch(update_note_status)
                .delete(delete_note),
        )
}
