//! Database migrations for the contacts schema
//!
//! Every statement is idempotent so startup can always run them.

use sqlx::PgPool;

use crate::Result;

/// Schema statements, applied in order
const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username VARCHAR(50) NOT NULL,
            email VARCHAR(150) NOT NULL,
            password VARCHAR(255) NOT NULL,
            avatar TEXT,
            refresh_token TEXT,
            confirmed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT users_email_key UNIQUE (email)
        )
        "#,
    ),
    (
        "users_token_columns",
        r#"
        ALTER TABLE users
            ALTER COLUMN avatar TYPE TEXT,
            ALTER COLUMN refresh_token TYPE TEXT
        "#,
    ),
    (
        "contacts",
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id SERIAL PRIMARY KEY,
            name VARCHAR(25) NOT NULL,
            lastname VARCHAR(25) NOT NULL,
            email VARCHAR(100) NOT NULL,
            phone VARCHAR(20) NOT NULL,
            address VARCHAR(100) NOT NULL,
            birthday DATE NOT NULL,
            user_id INTEGER REFERENCES users(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT contacts_email_key UNIQUE (email)
        )
        "#,
    ),
    (
        "notes",
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id SERIAL PRIMARY KEY,
            title VARCHAR(50) NOT NULL,
            description VARCHAR(150) NOT NULL,
            done BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "tags",
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id SERIAL PRIMARY KEY,
            name VARCHAR(25) NOT NULL,
            CONSTRAINT tags_name_key UNIQUE (name)
        )
        "#,
    ),
    (
        "note_tag_association",
        r#"
        CREATE TABLE IF NOT EXISTS note_tag_association (
            note_id INTEGER NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (note_id, tag_id)
        )
        "#,
    ),
    (
        "contact_note_association",
        r#"
        CREATE TABLE IF NOT EXISTS contact_note_association (
            contact_id INTEGER NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            note_id INTEGER NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            PRIMARY KEY (contact_id, note_id)
        )
        "#,
    ),
    (
        "contacts_user_id_idx",
        "CREATE INDEX IF NOT EXISTS contacts_user_id_idx ON contacts(user_id)",
    ),
];

/// Run all schema migrations inside one transaction
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Running schema migrations...");

    let mut tx = pool.begin().await?;
    for (name, sql) in STATEMENTS {
        tracing::debug!(object = name, "applying");
        sqlx::query(sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(count = STATEMENTS.len(), "Schema migrations complete");
    Ok(())
}
