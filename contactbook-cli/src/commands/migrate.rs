//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use contactbook_server::db::{create_pool, migrations};
use contactbook_server::Settings;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides DATABASE_URL from the environment or .env)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create any missing tables and indexes, then exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = match args.database_url {
        Some(url) => url,
        None => Settings::from_env().context("Invalid configuration")?.database_url,
    };

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Migration failed")?;

    pool.close().await;
    Ok(())
}
