//! User repository
//!
//! Users are looked up by email, which is unique.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::Email;

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub avatar: Option<String>,
    pub refresh_token: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Gravatar image URL for an email address.
pub fn gravatar_url(email: &str) -> String {
    let digest = md5::compute(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}", digest)
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT id, username, email, password, avatar, refresh_token,
                   confirmed, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a new, unconfirmed user with a Gravatar avatar.
    ///
    /// `password_hash` must already be hashed.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, DbError> {
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password, avatar, refresh_token,
                      confirmed, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(gravatar_url(email.as_str()))
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Store (or clear, with `None`) the user's refresh token.
    pub async fn update_token(&self, user_id: i32, token: Option<&str>) -> Result<(), DbError> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(token)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Mark the user's email as confirmed. Returns `false` if no such user.
    pub async fn confirm_email(&self, email: &str) -> Result<bool, DbError> {
        let result =
            sqlx::query("UPDATE users SET confirmed = TRUE, updated_at = NOW() WHERE email = $1")
                .bind(email)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the avatar URL, returning the updated user.
    pub async fn update_avatar_url(
        &self,
        email: &str,
        url: Option<&str>,
    ) -> Result<Option<User>, DbError> {
        let user: Option<User> = sqlx::query_as(
            r#"
            UPDATE users
            SET avatar = $2, updated_at = NOW()
            WHERE email = $1
            RETURNING id, username, email, password, avatar, refresh_token,
                      confirmed, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(url)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}
