//! Tag repository
//!
//! Tag names are unique; duplicates fail at the storage layer.

use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::{Pagination, TagInput};

/// Tag record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Tag repository
pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a page of tags.
    pub async fn list(&self, page: Pagination) -> Result<Vec<Tag>, DbError> {
        let tags: Vec<Tag> = sqlx::query_as(
            r#"
            SELECT id, name
            FROM tags
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Get a single tag by ID.
    pub async fn get(&self, id: i32) -> Result<Option<Tag>, DbError> {
        let tag: Option<Tag> = sqlx::query_as("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(tag)
    }

    pub async fn create(&self, body: &TagInput) -> Result<Tag, DbError> {
        let tag: Tag = sqlx::query_as("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(&body.name)
            .fetch_one(self.pool)
            .await?;

        Ok(tag)
    }

    /// Rename a tag. Returns `None` if it doesn't exist.
    pub async fn update(&self, id: i32, body: &TagInput) -> Result<Option<Tag>, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<Tag> = sqlx::query_as("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut tag) = existing else {
            return Ok(None);
        };
        tag.name.clone_from(&body.name);

        sqlx::query("UPDATE tags SET name = $2 WHERE id = $1")
            .bind(tag.id)
            .bind(&tag.name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(tag))
    }

    /// Delete a tag, returning the removed row. Note links cascade.
    pub async fn delete(&self, id: i32) -> Result<Option<Tag>, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<Tag> = sqlx::query_as("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(tag) = existing else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(tag.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(tag))
    }
}
