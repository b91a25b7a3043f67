//! Database repository for user balances and game history.

use derive_getters::Getters;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use rust_decimal::Decimal;

use crate::db::{DbError, GameRecord, NewGameRecord, NewUser, User, schema};
use crate::{Coins, CoinsError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Outcome of a committed balance update.
#[derive(Debug, Clone, Getters)]
pub struct Settlement {
    /// Balance after the update.
    balance: Coins,
    /// History row written alongside it.
    record: GameRecord,
}

/// Database repository for ledger operations.
///
/// Opens one SQLite connection per operation; no state is shared between
/// calls beyond the database file itself.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db_path: String,
}

impl LedgerRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// Use `":memory:"` only for single-call checks; every operation opens a
    /// fresh connection, so an in-memory database does not persist between
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating LedgerRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection with a busy timeout and foreign
    /// keys enforced.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            BUSY_TIMEOUT_MS
        ))?;
        Ok(conn)
    }

    /// Applies any pending embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(DbError::migration)?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Creates a user with the starting balance.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the email is already taken or a database error occurs.
    #[instrument(skip(self, password_hash))]
    pub fn create_user(&self, email: String, password_hash: String) -> Result<User, DbError> {
        self.create_user_with_balance(email, password_hash, Coins::starting())
    }

    /// Creates a user with an explicit opening balance.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the email is already taken or a database error occurs.
    #[instrument(skip(self, password_hash), fields(coins = %coins))]
    pub fn create_user_with_balance(
        &self,
        email: String,
        password_hash: String,
        coins: Coins,
    ) -> Result<User, DbError> {
        debug!(email = %email, "Creating user");
        let mut conn = self.connection()?;

        let new_user = NewUser::new(email, password_hash, coins.to_string());

        let user = diesel::insert_into(schema::users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), email = %user.email(), "User created");
        Ok(user)
    }

    /// Gets a user by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_user(&self, user_id: i32) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = Self::load_user(&mut conn, user_id)?;
        Ok(user)
    }

    /// Gets a user's game records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn game_history(&self, user_id: i32) -> Result<Vec<GameRecord>, DbError> {
        let mut conn = self.connection()?;
        let history = Self::load_history(&mut conn, user_id)?;
        Ok(history)
    }

    /// Loads a user and their history from one consistent snapshot.
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_profile(&self, user_id: i32) -> Result<Option<(User, Vec<GameRecord>)>, DbError> {
        let mut conn = self.connection()?;
        let profile = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let Some(user) = Self::load_user(conn, user_id)? else {
                return Ok(None);
            };
            let history = Self::load_history(conn, user_id)?;
            Ok(Some((user, history)))
        })?;

        if let Some((_, ref history)) = profile {
            debug!(user_id = %user_id, records = history.len(), "Profile loaded");
        } else {
            debug!(user_id = %user_id, "User not found");
        }
        Ok(profile)
    }

    /// Updates a user's balance and appends a game record atomically.
    ///
    /// The transaction is opened `IMMEDIATE`, so the write lock is held from
    /// the balance read until commit. Concurrent updates for the same user
    /// serialise instead of overwriting each other, and a failed history
    /// insert rolls the balance back. `apply` computes the new balance from
    /// the stored one; `amount` is recorded in the history row as given,
    /// rounded to two digits.
    ///
    /// Returns `Ok(None)` if the user does not exist; nothing is written and
    /// `amount` is not checked.
    ///
    /// # Errors
    ///
    /// Returns the first error from the connection, `apply`, the range check
    /// on `amount`, or the writes.
    #[instrument(skip(self, game, result, apply), fields(game = %game, result = %result, amount = %amount))]
    pub fn settle_game<F, E>(
        &self,
        user_id: i32,
        game: String,
        result: String,
        amount: Decimal,
        apply: F,
    ) -> Result<Option<Settlement>, E>
    where
        F: FnOnce(Coins) -> Result<Coins, E>,
        E: From<DbError> + From<diesel::result::Error> + From<CoinsError>,
    {
        let mut conn = self.connection()?;

        let settlement = conn.immediate_transaction::<_, E, _>(|conn| {
            let Some(user) = Self::load_user(conn, user_id)? else {
                debug!(user_id = %user_id, "User not found, nothing settled");
                return Ok(None);
            };

            let recorded = Coins::from_decimal(amount)?;
            let previous = user.balance()?;
            let balance = apply(previous)?;
            debug!(previous = %previous, balance = %balance, "Writing balance");

            diesel::update(schema::users::table.find(user_id))
                .set(schema::users::coins.eq(balance.to_string()))
                .execute(conn)?;

            let record = diesel::insert_into(schema::game_records::table)
                .values(&NewGameRecord::new(user_id, game, result, recorded))
                .returning(GameRecord::as_returning())
                .get_result(conn)?;

            Ok(Some(Settlement { balance, record }))
        })?;

        if let Some(ref s) = settlement {
            info!(
                user_id = %user_id,
                record_id = s.record.id(),
                balance = %s.balance,
                "Game settled"
            );
        }
        Ok(settlement)
    }

    fn load_user(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<Option<User>> {
        schema::users::table
            .find(user_id)
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    fn load_history(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<Vec<GameRecord>> {
        schema::game_records::table
            .filter(schema::game_records::user_id.eq(user_id))
            .order((
                schema::game_records::created_at.desc(),
                schema::game_records::id.desc(),
            ))
            .select(GameRecord::as_select())
            .load(conn)
    }
}
