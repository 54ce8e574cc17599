//! Shared setup for database-backed tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p contactbook-server -- --ignored

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use contactbook_server::db::{create_pool, migrations, User, UserRepo};
use contactbook_server::models::{ContactCreate, Email};
use sqlx::PgPool;

pub async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&url).await.expect("connect");
    migrations::run(&pool).await.expect("migrate");
    pool
}

/// Short suffix that differs between runs and between calls.
pub fn unique(prefix: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}{}", prefix, nanos % 1_000_000_000_000)
}

pub fn contact(email: &str) -> ContactCreate {
    ContactCreate {
        name: "Ann".into(),
        lastname: "Lee".into(),
        email: email.into(),
        phone: "555-0100".into(),
        address: "1 Main St".into(),
        birthday: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
    }
}

pub async fn user(pool: &PgPool) -> User {
    let email = Email::new(&format!("{}@example.com", unique("u")), 150).unwrap();
    UserRepo::new(pool)
        .create("tester", &email, "$argon2id$placeholder")
        .await
        .unwrap()
}
