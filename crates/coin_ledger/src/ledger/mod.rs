//! Exact coin arithmetic for the balance ledger.

mod coins;
mod error;
mod outcome;

pub use coins::{Coins, settle};
pub use error::CoinsError;
pub use outcome::Outcome;
