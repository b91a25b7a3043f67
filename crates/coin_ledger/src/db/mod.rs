//! Ledger store: users and their game records in SQLite.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{GameRecord, NewGameRecord, NewUser, User};
pub use repository::{LedgerRepository, Settlement};
