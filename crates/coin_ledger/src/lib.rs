//! Coin ledger - user profiles and win/loss coin balances for the game platform.
//!
//! # Architecture
//!
//! - **Ledger**: exact two-fraction-digit coin arithmetic ([`Coins`], [`settle`])
//! - **Db**: SQLite ledger store for users and game records ([`LedgerRepository`])
//! - **Profile**: the two operations, [`ProfileReader`] and [`BalanceUpdater`]
//! - **Server**: axum routes `GET /profile` and `POST /profile/coins`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use coin_ledger::{AppState, LedgerRepository, ServerConfig, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::from_file("coin_ledger.toml")?;
//! let repository = LedgerRepository::new(config.database_url().clone())?;
//! repository.run_migrations()?;
//!
//! let state = AppState::new(repository, Arc::new(config.token_table()));
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod auth;
mod config;
mod db;
mod ledger;
mod profile;
mod server;

// Crate-level exports - Coin arithmetic
pub use ledger::{Coins, CoinsError, Outcome, settle};

// Crate-level exports - Ledger store
pub use db::{DbError, GameRecord, LedgerRepository, NewGameRecord, NewUser, Settlement, User};

// Crate-level exports - Profile operations
pub use profile::{
    BalanceUpdater, CoinUpdate, CoinUpdateRequest, CoinUpdateResponse, ErrorKind, HistoryEntry,
    Profile, ProfileError, ProfileReader, ProfileUser, SUCCESS_MESSAGE,
};

// Crate-level exports - Identity
pub use auth::{Authenticator, Caller, Identity, TokenTable};

// Crate-level exports - Configuration
pub use config::{ConfigError, DATABASE_URL_VAR, ServerConfig};

// Crate-level exports - HTTP surface
pub use server::{ApiError, AppState, Endpoint, router};
