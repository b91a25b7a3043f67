//! Command-line interface for coin_ledger.

use clap::{Parser, Subcommand};

/// Coin Ledger - profile and coin balance service
#[derive(Parser, Debug)]
#[command(name = "coin_ledger")]
#[command(about = "Profile and coin-ledger HTTP service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (applies pending migrations first)
    Serve {
        /// Path to the TOML config file (defaults are used if it does not exist)
        #[arg(short, long, default_value = "coin_ledger.toml")]
        config: std::path::PathBuf,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, env = "DATABASE_URL", default_value = "coin_ledger.db")]
        database_url: String,
    },
}
