//! Profile reads and balance updates.

mod error;
mod reader;
mod request;
mod updater;
mod view;

pub use error::{ErrorKind, ProfileError};
pub use reader::ProfileReader;
pub use request::{CoinUpdate, CoinUpdateRequest};
pub use updater::BalanceUpdater;
pub use view::{CoinUpdateResponse, HistoryEntry, Profile, ProfileUser, SUCCESS_MESSAGE};
