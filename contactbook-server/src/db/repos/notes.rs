//! Note repository
//!
//! Notes carry their tag set. Create and update resolve the requested tag ids
//! and write the row and its associations in one transaction; ids that don't
//! name an existing tag are dropped silently.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};

use super::{DbError, Tag};
use crate::models::{NoteCreate, NoteStatusUpdate, NoteUpdate, Pagination};

/// Note row without its tags
#[derive(Debug, Clone, FromRow)]
struct NoteRow {
    id: i32,
    title: String,
    description: String,
    done: bool,
    created_at: DateTime<Utc>,
}

/// Note record with its tag set
#[derive(Debug, Clone)]
pub struct Note {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

impl Note {
    fn from_row(row: NoteRow, tags: Vec<Tag>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            done: row.done,
            created_at: row.created_at,
            tags,
        }
    }
}

/// Resolve tag ids to existing tags, dropping unknown ids.
async fn resolve_tags(conn: &mut PgConnection, ids: &[i32]) -> Result<Vec<Tag>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let tags: Vec<Tag> = sqlx::query_as(
        r#"
        SELECT id, name
        FROM tags
        WHERE id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(ids)
    .fetch_all(conn)
    .await?;

    Ok(tags)
}

/// Make `tags` the complete tag set of `note_id`.
async fn replace_tags(conn: &mut PgConnection, note_id: i32, tags: &[Tag]) -> Result<(), DbError> {
    sqlx::query("DELETE FROM note_tag_association WHERE note_id = $1")
        .bind(note_id)
        .execute(&mut *conn)
        .await?;

    if tags.is_empty() {
        return Ok(());
    }

    let tag_ids: Vec<i32> = tags.iter().map(|t| t.id).collect();
    sqlx::query(
        r#"
        INSERT INTO note_tag_association (note_id, tag_id)
        SELECT $1, UNNEST($2::int[])
        "#,
    )
    .bind(note_id)
    .bind(tag_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Load the tags of several notes with one query (no N+1).
async fn tags_for_notes<'e, E>(executor: E, note_ids: &[i32]) -> Result<HashMap<i32, Vec<Tag>>, DbError>
where
    E: PgExecutor<'e>,
{
    let mut by_note: HashMap<i32, Vec<Tag>> = HashMap::new();
    if note_ids.is_empty() {
        return Ok(by_note);
    }

    let rows: Vec<(i32, i32, String)> = sqlx::query_as(
        r#"
        SELECT nta.note_id, t.id, t.name
        FROM note_tag_association nta
        JOIN tags t ON t.id = nta.tag_id
        WHERE nta.note_id = ANY($1)
        ORDER BY t.id
        "#,
    )
    .bind(note_ids)
    .fetch_all(executor)
    .await?;

    for (note_id, id, name) in rows {
        by_note.entry(note_id).or_default().push(Tag { id, name });
    }
    Ok(by_note)
}

/// Attach tags to a batch of rows, preserving row order.
async fn with_tags(pool: &PgPool, rows: Vec<NoteRow>) -> Result<Vec<Note>, DbError> {
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let mut tags = tags_for_notes(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let note_tags = tags.remove(&row.id).unwrap_or_default();
            Note::from_row(row, note_tags)
        })
        .collect())
}

async fn fetch_row(conn: &mut PgConnection, id: i32) -> Result<Option<NoteRow>, DbError> {
    let row: Option<NoteRow> = sqlx::query_as(
        r#"
        SELECT id, title, description, done, created_at
        FROM notes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Note repository
pub struct NoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> NoteRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a page of notes with their tags.
    pub async fn list(&self, page: Pagination) -> Result<Vec<Note>, DbError> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, done, created_at
            FROM notes
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        with_tags(self.pool, rows).await
    }

    /// Notes attached to a contact.
    pub async fn list_for_contact(&self, contact_id: i32) -> Result<Vec<Note>, DbError> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            r#"
            SELECT n.id, n.title, n.description, n.done, n.created_at
            FROM notes n
            JOIN contact_note_association cna ON cna.note_id = n.id
            WHERE cna.contact_id = $1
            ORDER BY n.id
            "#,
        )
        .bind(contact_id)
        .fetch_all(self.pool)
        .await?;

        with_tags(self.pool, rows).await
    }

    /// Get a single note by ID.
    pub async fn get(&self, id: i32) -> Result<Option<Note>, DbError> {
        let mut conn = self.pool.acquire().await?;

        let Some(row) = fetch_row(&mut conn, id).await? else {
            return Ok(None);
        };
        let mut tags = tags_for_notes(&mut *conn, &[row.id]).await?;
        let note_tags = tags.remove(&row.id).unwrap_or_default();

        Ok(Some(Note::from_row(row, note_tags)))
    }

    /// Create a note and attach the tags that resolve (atomic).
    pub async fn create(&self, body: &NoteCreate) -> Result<Note, DbError> {
        let mut tx = self.pool.begin().await?;

        let tags = resolve_tags(&mut tx, &body.tags).await?;

        let row: NoteRow = sqlx::query_as(
            r#"
            INSERT INTO notes (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, done, created_at
            "#,
        )
        .bind(&body.title)
        .bind(&body.description)
        .fetch_one(&mut *tx)
        .await?;

        replace_tags(&mut tx, row.id, &tags).await?;

        tx.commit().await?;
        Ok(Note::from_row(row, tags))
    }

    /// Overwrite title, description and done, and replace the tag set with
    /// the resolved subset of `body.tags` (not merged).
    pub async fn update(&self, id: i32, body: &NoteUpdate) -> Result<Option<Note>, DbError> {
        let mut tx = self.pool.begin().await?;

        let Some(mut row) = fetch_row(&mut tx, id).await? else {
            return Ok(None);
        };

        row.title.clone_from(&body.title);
        row.description.clone_from(&body.description);
        row.done = body.done;

        sqlx::query(
            r#"
            UPDATE notes
            SET title = $2, description = $3, done = $4
            WHERE id = $1
            "#,
        )
        .bind(row.id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.done)
        .execute(&mut *tx)
        .await?;

        let tags = resolve_tags(&mut tx, &body.tags).await?;
        replace_tags(&mut tx, row.id, &tags).await?;

        tx.commit().await?;
        Ok(Some(Note::from_row(row, tags)))
    }

    /// Set only the done flag.
    pub async fn update_status(
        &self,
        id: i32,
        body: NoteStatusUpdate,
    ) -> Result<Option<Note>, DbError> {
        let mut tx = self.pool.begin().await?;

        let Some(mut row) = fetch_row(&mut tx, id).await? else {
            return Ok(None);
        };
        row.done = body.done;

        sqlx::query("UPDATE notes SET done = $2 WHERE id = $1")
            .bind(row.id)
            .bind(row.done)
            .execute(&mut *tx)
            .await?;

        let mut tags = tags_for_notes(&mut *tx, &[row.id]).await?;
        let note_tags = tags.remove(&row.id).unwrap_or_default();

        tx.commit().await?;
        Ok(Some(Note::from_row(row, note_tags)))
    }

    /// Delete a note, returning the removed row with the tags it had.
    pub async fn delete(&self, id: i32) -> Result<Option<Note>, DbError> {
        let mut tx = self.pool.begin().await?;

        let Some(row) = fetch_row(&mut tx, id).await? else {
            return Ok(None);
        };
        let mut tags = tags_for_notes(&mut *tx, &[row.id]).await?;
        let note_tags = tags.remove(&row.id).unwrap_or_default();

        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(Note::from_row(row, note_tags)))
    }
}
