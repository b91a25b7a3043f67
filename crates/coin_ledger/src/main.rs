//! Coin Ledger - profile and coin balance HTTP service.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use coin_ledger::{AppState, LedgerRepository, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config } => run_server(config).await,
        Command::Migrate { database_url } => run_migrations(database_url),
    }
}

/// Apply pending migrations
#[instrument]
fn run_migrations(database_url: String) -> Result<()> {
    let repository = LedgerRepository::new(database_url)?;
    repository.run_migrations()?;
    info!("Database is up to date");
    Ok(())
}

/// Run the HTTP server
#[instrument]
async fn run_server(config_path: std::path::PathBuf) -> Result<()> {
    let config = ServerConfig::from_file(&config_path)?.with_env_overrides();

    let repository = LedgerRepository::new(config.database_url().clone())?;
    repository.run_migrations()?;

    let state = AppState::new(repository, Arc::new(config.token_table()));
    let app = router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server ready at http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
