//! Read-only profile lookup.

use tracing::{debug, info, instrument, warn};

use crate::{HistoryEntry, Identity, LedgerRepository, Profile, ProfileError, ProfileUser};

/// Loads a caller's profile and game history.
#[derive(Debug, Clone)]
pub struct ProfileReader {
    repository: LedgerRepository,
}

impl ProfileReader {
    /// Creates a reader backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: LedgerRepository) -> Self {
        info!("Creating ProfileReader");
        Self { repository }
    }

    /// Returns the caller's user projection and history, most recent first.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::Unauthorized`] if `caller` is `None`.
    /// - [`ProfileError::NotFound`] if the user row is absent.
    /// - [`ProfileError::Db`] on storage failure or a corrupt amount.
    #[instrument(skip(self))]
    pub fn read(&self, caller: Option<Identity>) -> Result<Profile, ProfileError> {
        let Some(identity) = caller else {
            warn!("Profile requested without identity");
            return Err(ProfileError::Unauthorized);
        };
        let user_id = identity.user_id();

        let (user, records) = self
            .repository
            .load_profile(user_id)?
            .ok_or(ProfileError::NotFound(user_id))?;

        let history = records
            .iter()
            .map(HistoryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(user_id = %user_id, records = history.len(), "Profile assembled");
        Ok(Profile {
            user: ProfileUser::try_from(&user)?,
            history,
        })
    }
}
