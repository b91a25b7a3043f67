//! Win/loss balance updates.

use tracing::{debug, info, instrument, warn};

use crate::{
    CoinUpdateRequest, CoinUpdateResponse, Identity, LedgerRepository, ProfileError,
    SUCCESS_MESSAGE, settle,
};

/// Applies a game outcome to the caller's balance and records it.
#[derive(Debug, Clone)]
pub struct BalanceUpdater {
    repository: LedgerRepository,
}

impl BalanceUpdater {
    /// Creates an updater backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: LedgerRepository) -> Self {
        info!("Creating BalanceUpdater");
        Self { repository }
    }

    /// Validates the request, then settles it against the caller's balance.
    ///
    /// Validation runs before the identity check, so a malformed body is a
    /// bad request even without credentials. The balance write and the
    /// history insert commit together.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::BadRequest`] if the body is invalid.
    /// - [`ProfileError::Unauthorized`] if `caller` is `None`.
    /// - [`ProfileError::NotFound`] if the user row is absent.
    /// - [`ProfileError::Db`] or [`ProfileError::Coins`] on storage or
    ///   arithmetic failure; nothing is written in that case.
    #[instrument(skip(self, request))]
    pub fn update(
        &self,
        caller: Option<Identity>,
        request: CoinUpdateRequest,
    ) -> Result<CoinUpdateResponse, ProfileError> {
        let update = request.validate()?;

        let Some(identity) = caller else {
            warn!("Coin update without identity");
            return Err(ProfileError::Unauthorized);
        };
        let user_id = identity.user_id();

        // History keeps the input amount, not the applied delta.
        let (outcome, amount) = (update.outcome, update.amount);
        debug!(user_id = %user_id, outcome = %outcome, amount = %amount, "Settling");

        let settlement = self
            .repository
            .settle_game(
                user_id,
                update.game,
                update.result,
                amount,
                |balance| settle(balance, outcome, amount).map_err(ProfileError::from),
            )?
            .ok_or(ProfileError::NotFound(user_id))?;

        info!(
            user_id = %user_id,
            balance = %settlement.balance(),
            "Coins updated"
        );
        Ok(CoinUpdateResponse {
            message: SUCCESS_MESSAGE.to_string(),
            new_balance: settlement.balance().to_f64(),
        })
    }
}
