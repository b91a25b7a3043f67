//! Fixed-point coin amounts stored as two-fraction-digit decimal strings.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, instrument};

use crate::ledger::{CoinsError, Outcome};

/// Number of fraction digits every coin value carries.
const SCALE: u32 = 2;

/// Largest magnitude a DECIMAL(12,2) column holds.
fn column_max() -> Decimal {
    Decimal::new(9_999_999_999_99, SCALE)
}

/// Rounds to two fraction digits, midpoint away from zero.
///
/// The result always has scale 2 and never carries a negative zero, so
/// its `Display` output is stable ("0.00", never "-0.00").
fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return Decimal::new(0, SCALE);
    }
    rounded.rescale(SCALE);
    rounded
}

/// An exact coin amount with two fraction digits.
///
/// Values are held as [`Decimal`] and only turned into text at the storage
/// and JSON boundary. Every constructor rounds to two fraction digits and
/// enforces the storage range, so a `Coins` always renders as a string the
/// ledger columns accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coins(Decimal);

impl Coins {
    /// Zero coins.
    pub fn zero() -> Self {
        Self(Decimal::new(0, SCALE))
    }

    /// Balance a freshly created user starts with.
    pub fn starting() -> Self {
        Self(Decimal::new(100_00, SCALE))
    }

    /// Rounds `value` to two fraction digits.
    ///
    /// # Errors
    ///
    /// Returns [`CoinsError::OutOfRange`] if the rounded magnitude does not
    /// fit a DECIMAL(12,2) column.
    pub fn from_decimal(value: Decimal) -> Result<Self, CoinsError> {
        let rounded = round2(value);
        if rounded.abs() > column_max() {
            return Err(CoinsError::OutOfRange(rounded.to_string()));
        }
        Ok(Self(rounded))
    }

    /// Parses the stored text form ("100.00") or any plain decimal text.
    ///
    /// # Errors
    ///
    /// Returns [`CoinsError::Invalid`] for non-decimal text and
    /// [`CoinsError::OutOfRange`] for values the column cannot hold.
    #[instrument(skip(text), fields(text = %text))]
    pub fn parse(text: &str) -> Result<Self, CoinsError> {
        let trimmed = text.trim();
        let value = Decimal::from_str_exact(trimmed)
            .map_err(|_| CoinsError::Invalid(trimmed.to_string()))?;
        Self::from_decimal(value)
    }

    /// The underlying decimal value (scale 2).
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for JSON responses that expect a number.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl Default for Coins {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Applies a game outcome to a balance.
///
/// A win adds `amount`, a loss subtracts it; the sum is rounded to two
/// fraction digits and floored at zero. The floor applies to both outcomes,
/// so a negative win amount cannot push the balance below zero either.
///
/// # Errors
///
/// Returns [`CoinsError::Overflow`] if the decimal arithmetic overflows and
/// [`CoinsError::OutOfRange`] if the new balance does not fit the column.
#[instrument(skip(balance, amount), fields(balance = %balance, amount = %amount))]
pub fn settle(balance: Coins, outcome: Outcome, amount: Decimal) -> Result<Coins, CoinsError> {
    let raw = match outcome {
        Outcome::Win => balance.0.checked_add(amount),
        Outcome::Loss => balance.0.checked_sub(amount),
    }
    .ok_or(CoinsError::Overflow)?;

    let settled = Coins::from_decimal(round2(raw).max(Decimal::ZERO))?;
    debug!(outcome = %outcome, settled = %settled, "Balance settled");
    Ok(settled)
}
