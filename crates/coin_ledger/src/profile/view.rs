//! JSON shapes returned by the profile endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{DbError, GameRecord, User};

/// Message returned after a successful coin update.
pub const SUCCESS_MESSAGE: &str = "Monedas actualizadas correctamente";

/// `GET /profile` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// The caller's account.
    pub user: ProfileUser,
    /// Game records, most recent first.
    pub history: Vec<HistoryEntry>,
}

/// Public projection of a user row. The password hash is never included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    /// User id.
    pub id: i32,
    /// Login email.
    pub email: String,
    /// Balance as a two-fraction-digit string.
    pub coins: String,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

/// Public projection of a game record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Record id.
    pub id: i32,
    /// Game name.
    pub game: String,
    /// Result as reported.
    pub result: String,
    /// Amount as a two-fraction-digit string.
    pub amount: String,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// `POST /profile/coins` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinUpdateResponse {
    /// Confirmation text.
    pub message: String,
    /// New balance as a JSON number.
    pub new_balance: f64,
}

impl TryFrom<&User> for ProfileUser {
    type Error = DbError;

    /// Re-renders the stored balance through `Coins` so the string always
    /// has exactly two fraction digits.
    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *user.id(),
            email: user.email().clone(),
            coins: user.balance()?.to_string(),
            created_at: user.created_at().and_utc(),
        })
    }
}

impl TryFrom<&GameRecord> for HistoryEntry {
    type Error = DbError;

    fn try_from(record: &GameRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *record.id(),
            game: record.game().clone(),
            result: record.result().clone(),
            amount: record.amount_coins()?.to_string(),
            created_at: record.created_at().and_utc(),
        })
    }
}
