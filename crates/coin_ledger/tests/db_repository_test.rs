//! Tests for ledger repository operations.

use std::str::FromStr;

use rust_decimal::Decimal;
use tempfile::NamedTempFile;

use coin_ledger::{Coins, DbError, LedgerRepository, Outcome, settle};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, LedgerRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = LedgerRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

fn coins(text: &str) -> Coins {
    Coins::parse(text).expect("Invalid coins")
}

fn settle_win(
    repo: &LedgerRepository,
    user_id: i32,
    game: &str,
    amount: &str,
) -> Option<coin_ledger::Settlement> {
    let amount = Decimal::from_str(amount).expect("Invalid amount");
    repo.settle_game::<_, DbError>(
        user_id,
        game.to_string(),
        "win".to_string(),
        amount,
        |balance| Ok(settle(balance, Outcome::Win, amount).expect("Settle failed")),
    )
    .expect("Settle game failed")
}

#[test]
fn test_empty_path_rejected() {
    assert!(LedgerRepository::new("  ".to_string()).is_err());
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, repo) = setup_test_db();
    repo.run_migrations().expect("Second run failed");
}

#[test]
fn test_create_user_starts_with_default_balance() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("alice@example.com".to_string(), "hash".to_string())
        .expect("Create failed");
    assert_eq!(user.email(), "alice@example.com");
    assert_eq!(user.coins(), "100.00");
    assert!(*user.id() > 0);
}

#[test]
fn test_create_user_duplicate_email_fails() {
    let (_db, repo) = setup_test_db();
    repo.create_user("bob@example.com".to_string(), "hash".to_string())
        .expect("First create failed");
    let result = repo.create_user("bob@example.com".to_string(), "other".to_string());
    assert!(result.is_err(), "Duplicate email should fail");
}

#[test]
fn test_find_user() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("carol@example.com".to_string(), "hash".to_string())
        .expect("Create failed");

    let found = repo.find_user(*user.id()).expect("Query failed");
    assert_eq!(found.expect("User missing").email(), "carol@example.com");

    let missing = repo.find_user(*user.id() + 100).expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_balance_round_trip() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user_with_balance("dave@example.com".to_string(), "hash".to_string(), coins("12.3"))
        .expect("Create failed");
    assert_eq!(user.coins(), "12.30");

    let reread = repo.find_user(*user.id()).expect("Query failed").expect("User missing");
    assert_eq!(reread.coins(), "12.30");
    assert_eq!(reread.balance().expect("Parse failed").to_string(), "12.30");
}

#[test]
fn test_settle_game_writes_balance_and_record() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("eve@example.com".to_string(), "hash".to_string())
        .expect("Create failed");

    let settlement = settle_win(&repo, *user.id(), "slots", "50").expect("User missing");
    assert_eq!(settlement.balance().to_string(), "150.00");
    assert_eq!(settlement.record().game(), "slots");
    assert_eq!(settlement.record().result(), "win");
    assert_eq!(settlement.record().amount(), "50.00");
    assert_eq!(settlement.record().user_id(), user.id());

    let stored = repo.find_user(*user.id()).expect("Query failed").expect("User missing");
    assert_eq!(stored.coins(), "150.00");
}

#[test]
fn test_settle_game_unknown_user_writes_nothing() {
    let (_db, repo) = setup_test_db();
    let settlement = settle_win(&repo, 42, "slots", "5");
    assert!(settlement.is_none());
    assert!(repo.game_history(42).expect("History failed").is_empty());
}

#[test]
fn test_settle_game_failure_rolls_back() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("frank@example.com".to_string(), "hash".to_string())
        .expect("Create failed");

    let result = repo.settle_game::<_, DbError>(
        *user.id(),
        "slots".to_string(),
        "win".to_string(),
        Decimal::new(10, 0),
        |_| Err(DbError::new("refused")),
    );
    assert!(result.is_err());

    let stored = repo.find_user(*user.id()).expect("Query failed").expect("User missing");
    assert_eq!(stored.coins(), "100.00");
    assert!(repo.game_history(*user.id()).expect("History failed").is_empty());
}

#[test]
fn test_settle_game_amount_out_of_range_writes_nothing() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("fiona@example.com".to_string(), "hash".to_string())
        .expect("Create failed");

    let result = repo.settle_game::<_, DbError>(
        *user.id(),
        "slots".to_string(),
        "win".to_string(),
        Decimal::new(10_000_000_000, 0),
        Ok,
    );
    assert!(result.is_err());

    let stored = repo.find_user(*user.id()).expect("Query failed").expect("User missing");
    assert_eq!(stored.coins(), "100.00");
    assert!(repo.game_history(*user.id()).expect("History failed").is_empty());
}

#[test]
fn test_settle_game_unknown_user_skips_amount_check() {
    let (_db, repo) = setup_test_db();
    let settlement = repo
        .settle_game::<_, DbError>(
            42,
            "slots".to_string(),
            "win".to_string(),
            Decimal::new(10_000_000_000, 0),
            Ok,
        )
        .expect("Settle game failed");
    assert!(settlement.is_none());
}

#[test]
fn test_game_history_most_recent_first() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("grace@example.com".to_string(), "hash".to_string())
        .expect("Create failed");

    for game in ["first", "second", "third"] {
        settle_win(&repo, *user.id(), game, "1").expect("User missing");
    }

    let history = repo.game_history(*user.id()).expect("History failed");
    let games: Vec<&str> = history.iter().map(|r| r.game().as_str()).collect();
    assert_eq!(games, ["third", "second", "first"]);
}

#[test]
fn test_game_history_is_per_user() {
    let (_db, repo) = setup_test_db();
    let hank = repo
        .create_user("hank@example.com".to_string(), "hash".to_string())
        .expect("Create failed");
    let ida = repo
        .create_user("ida@example.com".to_string(), "hash".to_string())
        .expect("Create failed");

    settle_win(&repo, *hank.id(), "slots", "1").expect("User missing");
    settle_win(&repo, *hank.id(), "dice", "1").expect("User missing");
    settle_win(&repo, *ida.id(), "slots", "1").expect("User missing");

    assert_eq!(repo.game_history(*hank.id()).expect("History failed").len(), 2);
    assert_eq!(repo.game_history(*ida.id()).expect("History failed").len(), 1);
}

#[test]
fn test_load_profile() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("judy@example.com".to_string(), "hash".to_string())
        .expect("Create failed");
    settle_win(&repo, *user.id(), "roulette", "2.5").expect("User missing");

    let (loaded, history) = repo
        .load_profile(*user.id())
        .expect("Load failed")
        .expect("User missing");
    assert_eq!(loaded.coins(), "102.50");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount(), "2.50");
    assert_eq!(history[0].amount_coins().expect("Parse failed"), coins("2.5"));

    assert!(repo.load_profile(*user.id() + 1).expect("Load failed").is_none());
}
