//! HTTP server command
//!
//! Runs the contacts API with every route group mounted under `/api`.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use contactbook_server::{serve, ServerConfig, Settings};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Database URL (overrides DATABASE_URL from the environment or .env)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Start without applying schema migrations
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut settings = Settings::from_env().context("Invalid configuration")?;
    if let Some(url) = args.database_url {
        settings.database_url = url;
    }

    tracing::info!("Starting contactbook server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        timeout: Duration::from_secs(args.timeout),
        run_migrations: !args.skip_migrations,
    };

    // Blocks until shutdown
    serve(settings, config).await.context("Server error")?;

    Ok(())
}
