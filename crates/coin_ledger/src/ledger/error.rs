//! Coin arithmetic error types.

use derive_more::{Display, Error};

/// Failure to build or combine [`Coins`](crate::Coins) values.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CoinsError {
    /// Text that is not a plain decimal number.
    #[display("Invalid decimal '{}'", _0)]
    Invalid(#[error(not(source))] String),
    /// Value outside the DECIMAL(12,2) storage range.
    #[display("Coin value {} exceeds the storable range", _0)]
    OutOfRange(#[error(not(source))] String),
    /// Decimal arithmetic overflowed.
    #[display("Coin arithmetic overflowed")]
    Overflow,
}
