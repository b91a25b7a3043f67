//! Classification of reported game results.

use derive_more::Display;
use tracing::instrument;

/// How a reported result moves the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Outcome {
    /// Amount is credited.
    #[display("win")]
    Win,
    /// Amount is debited, clamped at zero.
    #[display("loss")]
    Loss,
}

impl Outcome {
    /// Classifies a raw result string.
    ///
    /// Only the exact string `"win"` credits the balance; every other
    /// value (including `"loss"`, `"draw"`, or `"WIN"`) debits it.
    #[instrument(skip(result), fields(result = %result))]
    pub fn classify(result: &str) -> Self {
        if result == "win" { Self::Win } else { Self::Loss }
    }
}
