//! Contact endpoints
//!
//! Contacts belong to the authenticated caller; another user's contact is
//! indistinguishable from a missing one.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use super::notes::{note_list, NoteResponse};
use crate::db::repos::{Contact, ContactRepo, NoteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidPath, ValidQuery};
use crate::models::{ContactCreate, ContactQuery, ContactUpdate, PaginationParams};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 10;

/// Contact response
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birthday: chrono::NaiveDate,
    pub user_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            lastname: c.lastname,
            email: c.email,
            phone: c.phone,
            address: c.address,
            birthday: c.birthday,
            user_id: c.user_id,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

fn contact_list(contacts: Vec<Contact>) -> Json<Vec<ContactResponse>> {
    Json(contacts.into_iter().map(ContactResponse::from).collect())
}

/// GET /contacts?limit=&offset=&q=
async fn list_contacts(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidQuery(query): ValidQuery<ContactQuery>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let page = PaginationParams {
        limit: query.limit,
        offset: query.offset,
    }
    .with_default_limit(DEFAULT_LIMIT);

    let contacts = ContactRepo::new(&state.pool)
        .list(page, Some(user.id), query.q.as_deref())
        .await?;
    Ok(contact_list(contacts))
}

/// GET /contacts/birthdays - birthdays in the coming week
async fn upcoming_birthdays(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let contacts = ContactRepo::new(&state.pool)
        .upcoming_birthdays(Some(user.id), today)
        .await?;
    Ok(contact_list(contacts))
}

/// GET /contacts/{id}
async fn get_contact(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = ContactRepo::new(&state.pool)
        .get(id, Some(user.id))
        .await?
        .ok_or(ApiError::NotFound("Contact not found"))?;
    Ok(Json(contact.into()))
}

/// POST /contacts
async fn create_contact(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidJson(body): ValidJson<ContactCreate>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    body.validate()?;
    let contact = ContactRepo::new(&state.pool)
        .create(&body, Some(user.id))
        .await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

/// PUT /contacts/{id} - fields left out keep their value
async fn update_contact(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i32>,
    ValidJson(body): ValidJson<ContactUpdate>,
) -> Result<Json<ContactResponse>, ApiError> {
    body.validate()?;
    let contact = ContactRepo::new(&state.pool)
        .update(id, &body, Some(user.id))
        .await?
        .ok_or(ApiError::NotFound("Contact not found"))?;
    Ok(Json(contact.into()))
}

/// DELETE /contacts/{id}
async fn delete_contact(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = ContactRepo::new(&state.pool)
        .delete(id, Some(user.id))
        .await?
        .ok_or(ApiError::NotFound("Contact not found"))?;
    Ok(Json(contact.into()))
}

/// GET /contacts/{id}/notes
async fn contact_notes(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    ContactRepo::new(&state.pool)
        .get(id, Some(user.id))
        .await?
        .ok_or(ApiError::NotFound("Contact not found"))?;

    let notes = NoteRepo::new(&state.pool).list_for_contact(id).await?;
    Ok(note_list(notes))
}

/// PUT /contacts/{id}/notes/{note_id} - attach an existing note
async fn attach_note(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidPath((id, note_id)): ValidPath<(i32, i32)>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let attached = ContactRepo::new(&state.pool)
        .attach_note(id, note_id, Some(user.id))
        .await?;
    if !attached {
        return Err(ApiError::NotFound("Contact or note not found"));
    }

    let notes = NoteRepo::new(&state.pool).list_for_contact(id).await?;
    Ok(note_list(notes))
}

/// Contact routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/birthdays", get(upcoming_birthdays))
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/contacts/{id}/notes", get(contact_notes))
        .route("/contacts/{id}/notes/{note_id}", put(attach_note))
}
