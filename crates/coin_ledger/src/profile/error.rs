//! Profile operation errors.

use derive_more::{Display, Error};

use crate::{CoinsError, DbError};

/// Coarse classification surfaced to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Missing or malformed input.
    BadRequest,
    /// No caller identity.
    Unauthorized,
    /// The caller's user row is absent.
    NotFound,
    /// Storage or unexpected failure; details stay server-side.
    Internal,
}

/// Failure of a profile read or balance update.
#[derive(Debug, Display, Error)]
pub enum ProfileError {
    /// The request carried no resolvable identity.
    #[display("Caller is not authenticated")]
    Unauthorized,
    /// The authenticated user has no row.
    #[display("User {} not found", _0)]
    NotFound(#[error(not(source))] i32),
    /// The request body failed validation.
    #[display("Invalid request: {}", _0)]
    BadRequest(#[error(not(source))] String),
    /// Ledger store failure.
    #[display("{}", _0)]
    Db(DbError),
    /// Coin arithmetic failure.
    #[display("{}", _0)]
    Coins(CoinsError),
    /// The blocking task running the operation did not complete.
    #[display("Background task failed: {}", _0)]
    Task(#[error(not(source))] String),
}

impl ProfileError {
    /// Folds the error into its client-facing kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Db(_) | Self::Coins(_) | Self::Task(_) => ErrorKind::Internal,
        }
    }
}

impl From<DbError> for ProfileError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

impl From<CoinsError> for ProfileError {
    fn from(err: CoinsError) -> Self {
        Self::Coins(err)
    }
}

impl From<diesel::result::Error> for ProfileError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Db(DbError::from(err))
    }
}

impl From<tokio::task::JoinError> for ProfileError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
