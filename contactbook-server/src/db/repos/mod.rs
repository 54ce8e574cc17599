//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Single-row lookups return `Option` (absence is not an error)
//! - Mutations are fetch-then-write inside one transaction
//! - Unique constraint violations surface as [`DbError::Conflict`]

pub mod contacts;
pub mod notes;
pub mod tags;
pub mod users;

pub use contacts::{upcoming_birthday_window, BirthdayWindow, Contact, ContactRepo};
pub use notes::{Note, NoteRepo};
pub use tags::{Tag, TagRepo};
pub use users::{gravatar_url, User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return Self::Conflict {
                    constraint: db.constraint().unwrap_or_default().to_owned(),
                };
            }
        }
        Self::Sqlx(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_sqlx() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }
}
