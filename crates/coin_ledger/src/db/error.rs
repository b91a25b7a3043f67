//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::CoinsError;

/// Ledger store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A monetary column holds text that is not a valid coin amount.
    #[track_caller]
    pub fn corrupt_amount(table: &str, row_id: i32, err: &CoinsError) -> Self {
        Self::new(format!("Corrupt amount in {} row {}: {}", table, row_id, err))
    }

    /// Applying embedded migrations failed.
    #[track_caller]
    pub fn migration(err: impl std::fmt::Display) -> Self {
        Self::new(format!("Migration failed: {}", err))
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

impl From<CoinsError> for DbError {
    #[track_caller]
    fn from(err: CoinsError) -> Self {
        Self::new(format!("Amount not storable: {}", err))
    }
}
