//! Contact repository
//!
//! Contacts are optionally owned by a user. Every lookup takes an optional
//! owner; when given, rows owned by someone else are treated as absent.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::{ContactCreate, ContactUpdate, Pagination};

/// Contact record from database
#[derive(Debug, Clone, FromRow)]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birthday: NaiveDate,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Day-of-month window used by the upcoming-birthday filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    pub month: u32,
    pub from_day: u32,
    pub to_day: u32,
}

/// Compute the birthday window for `today`.
///
/// Matches birthdays in today's month whose day lies between today's day and
/// the day-of-month seven days from now. Near month end `to_day` wraps to a
/// small number and the window comes out empty; late-month birthdays that
/// spill into the next month are never matched.
pub fn upcoming_birthday_window(today: NaiveDate) -> BirthdayWindow {
    let next_week = today + Duration::days(7);
    BirthdayWindow {
        month: today.month(),
        from_day: today.day(),
        to_day: next_week.day(),
    }
}

/// Build an ILIKE pattern matching `query` anywhere, with wildcards escaped.
fn contains_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Contact repository
pub struct ContactRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a page of contacts, optionally scoped to an owner and filtered
    /// by a case-insensitive substring over name, lastname and email.
    pub async fn list(
        &self,
        page: Pagination,
        owner: Option<i32>,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, DbError> {
        let pattern = search
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(contains_pattern);

        let contacts: Vec<Contact> = sqlx::query_as(
            r#"
            SELECT id, name, lastname, email, phone, address, birthday,
                   user_id, created_at, updated_at
            FROM contacts
            WHERE ($1::int IS NULL OR user_id = $1)
              AND ($2::text IS NULL
                   OR name ILIKE $2
                   OR lastname ILIKE $2
                   OR email ILIKE $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    /// Get a single contact by ID.
    pub async fn get(&self, id: i32, owner: Option<i32>) -> Result<Option<Contact>, DbError> {
        let contact: Option<Contact> = sqlx::query_as(
            r#"
            SELECT id, name, lastname, email, phone, address, birthday,
                   user_id, created_at, updated_at
            FROM contacts
            WHERE id = $1 AND ($2::int IS NULL OR user_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact)
    }

    /// Insert a contact and return it with its generated id and timestamps.
    pub async fn create(
        &self,
        body: &ContactCreate,
        owner: Option<i32>,
    ) -> Result<Contact, DbError> {
        let contact: Contact = sqlx::query_as(
            r#"
            INSERT INTO contacts (name, lastname, email, phone, address, birthday, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, lastname, email, phone, address, birthday,
                      user_id, created_at, updated_at
            "#,
        )
        .bind(&body.name)
        .bind(&body.lastname)
        .bind(&body.email)
        .bind(&body.phone)
        .bind(&body.address)
        .bind(body.birthday)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(contact)
    }

    /// Overwrite the fields present in `body`.
    ///
    /// Returns `None` if the contact doesn't exist (or isn't owned by `owner`).
    pub async fn update(
        &self,
        id: i32,
        body: &ContactUpdate,
        owner: Option<i32>,
    ) -> Result<Option<Contact>, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<Contact> = sqlx::query_as(
            r#"
            SELECT id, name, lastname, email, phone, address, birthday,
                   user_id, created_at, updated_at
            FROM contacts
            WHERE id = $1 AND ($2::int IS NULL OR user_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut contact) = existing else {
            return Ok(None);
        };

        if let Some(name) = &body.name {
            contact.name.clone_from(name);
        }
        if let Some(lastname) = &body.lastname {
            contact.lastname.clone_from(lastname);
        }
        if let Some(email) = &body.email {
            contact.email.clone_from(email);
        }
        if let Some(phone) = &body.phone {
            contact.phone.clone_from(phone);
        }
        if let Some(address) = &body.address {
            contact.address.clone_from(address);
        }
        if let Some(birthday) = body.birthday {
            contact.birthday = birthday;
        }

        let updated: Contact = sqlx::query_as(
            r#"
            UPDATE contacts
            SET name = $2, lastname = $3, email = $4, phone = $5,
                address = $6, birthday = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, lastname, email, phone, address, birthday,
                      user_id, created_at, updated_at
            "#,
        )
        .bind(contact.id)
        .bind(&contact.name)
        .bind(&contact.lastname)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.address)
        .bind(contact.birthday)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete a contact, returning the removed row.
    ///
    /// Association rows go with it (cascade); the notes stay.
    pub async fn delete(&self, id: i32, owner: Option<i32>) -> Result<Option<Contact>, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<Contact> = sqlx::query_as(
            r#"
            SELECT id, name, lastname, email, phone, address, birthday,
                   user_id, created_at, updated_at
            FROM contacts
            WHERE id = $1 AND ($2::int IS NULL OR user_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(contact) = existing else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(contact.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(contact))
    }

    /// Attach a note to a contact (idempotent).
    ///
    /// Returns `false` if either the contact or the note doesn't exist.
    pub async fn attach_note(
        &self,
        contact_id: i32,
        note_id: i32,
        owner: Option<i32>,
    ) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        let (contact_exists, note_exists): (bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM contacts
                       WHERE id = $1 AND ($3::int IS NULL OR user_id = $3)),
                EXISTS(SELECT 1 FROM notes WHERE id = $2)
            "#,
        )
        .bind(contact_id)
        .bind(note_id)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        if !(contact_exists && note_exists) {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO contact_note_association (contact_id, note_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(contact_id)
        .bind(note_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Contacts whose birthday falls in [`upcoming_birthday_window`] for `today`.
    pub async fn upcoming_birthdays(
        &self,
        owner: Option<i32>,
        today: NaiveDate,
    ) -> Result<Vec<Contact>, DbError> {
        let window = upcoming_birthday_window(today);

        let contacts: Vec<Contact> = sqlx::query_as(
            r#"
            SELECT id, name, lastname, email, phone, address, birthday,
                   user_id, created_at, updated_at
            FROM contacts
            WHERE ($1::int IS NULL OR user_id = $1)
              AND EXTRACT(MONTH FROM birthday) = $2
              AND EXTRACT(DAY FROM birthday) >= $3
              AND EXTRACT(DAY FROM birthday) <= $4
            ORDER BY birthday, id
            "#,
        )
        .bind(owner)
        .bind(window.month as i32)
        .bind(window.from_day as i32)
        .bind(window.to_day as i32)
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }
}
