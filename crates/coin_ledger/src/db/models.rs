//! Ledger row models.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::Coins;

/// User row. `coins` holds the two-fraction-digit balance text.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    id: i32,
    email: String,
    password_hash: String,
    coins: String,
    created_at: NaiveDateTime,
}

impl User {
    /// Parses the stored balance.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column does not hold a valid amount.
    #[instrument(skip(self), fields(user_id = self.id, coins = %self.coins))]
    pub fn balance(&self) -> Result<Coins, DbError> {
        Coins::parse(&self.coins).map_err(|e| DbError::corrupt_amount("users", self.id, &e))
    }
}

/// Insertable user.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    email: String,
    password_hash: String,
    coins: String,
}

/// Game history row. Immutable once written.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::game_records)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRecord {
    id: i32,
    user_id: i32,
    game: String,
    result: String,
    amount: String,
    created_at: NaiveDateTime,
}

impl GameRecord {
    /// Parses the stored amount.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column does not hold a valid amount.
    #[instrument(skip(self), fields(record_id = self.id, amount = %self.amount))]
    pub fn amount_coins(&self) -> Result<Coins, DbError> {
        Coins::parse(&self.amount)
            .map_err(|e| DbError::corrupt_amount("game_records", self.id, &e))
    }
}

/// Insertable game record.
///
/// `created_at` is stamped with sub-second precision so that history
/// ordering follows insertion order even within one second.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::game_records)]
pub struct NewGameRecord {
    user_id: i32,
    game: String,
    result: String,
    amount: String,
    created_at: NaiveDateTime,
}

impl NewGameRecord {
    /// Creates a record stamped with the current time.
    pub fn new(user_id: i32, game: String, result: String, amount: Coins) -> Self {
        Self {
            user_id,
            game,
            result,
            amount: amount.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}
