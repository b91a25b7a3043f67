//! Caller identity resolution.

use std::collections::HashMap;
use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use derive_new::new;
use tracing::debug;

use crate::AppState;

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct Identity {
    user_id: i32,
}

impl Identity {
    /// The caller's user id.
    pub fn user_id(&self) -> i32 {
        self.user_id
    }
}

/// Resolves a bearer token to an [`Identity`].
pub trait Authenticator: fmt::Debug + Send + Sync {
    /// Returns the identity for `token`, or `None` if it is unknown.
    fn authenticate(&self, token: &str) -> Option<Identity>;
}

/// Fixed table of opaque tokens, loaded from configuration.
#[derive(Clone, Default, new)]
pub struct TokenTable {
    tokens: HashMap<String, i32>,
}

impl fmt::Debug for TokenTable {
    // Tokens are credentials; only the count is printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenTable")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl Authenticator for TokenTable {
    fn authenticate(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).copied().map(Identity::new)
    }
}

/// Axum extractor for the optional caller identity.
///
/// Never rejects: a missing, malformed or unknown `Authorization: Bearer`
/// header yields `Caller(None)` and the operation decides how to fail.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Option<Identity>);

impl FromRequestParts<AppState> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        let Some(token) = token else {
            debug!("No bearer token");
            return Ok(Self(None));
        };

        let identity = state.authenticator().authenticate(token);
        debug!(resolved = identity.is_some(), "Bearer token checked");
        Ok(Self(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_table_lookup() {
        let table = TokenTable::new(HashMap::from([("alice-token".to_string(), 1)]));
        assert_eq!(table.authenticate("alice-token"), Some(Identity::new(1)));
        assert_eq!(table.authenticate("unknown"), None);
    }

    #[test]
    fn test_debug_hides_tokens() {
        let table = TokenTable::new(HashMap::from([("secret".to_string(), 1)]));
        let printed = format!("{:?}", table);
        assert!(!printed.contains("secret"));
    }
}
