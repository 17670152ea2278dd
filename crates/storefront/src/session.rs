//! Shared authentication session handle.
//!
//! The remote cart client reads the bearer token from this handle at request
//! time, so signing in or out takes effect on the next request without
//! rebuilding any clients. Obtaining tokens (login, registration) is outside
//! this crate; callers hand the session whatever token their auth flow
//! produced.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::SecretString;

/// Current authentication state.
#[derive(Clone, Default)]
enum SessionState {
    /// Browsing anonymously; the cart lives in local storage.
    #[default]
    Guest,
    /// Signed in; the cart lives on the server.
    Authenticated { token: SecretString },
}

/// Cheaply cloneable handle to the current authentication state.
#[derive(Clone, Default)]
pub struct AuthSession {
    state: Arc<RwLock<SessionState>>,
}

impl AuthSession {
    /// Create a guest session.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// Create a session already holding a bearer token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.sign_in(SecretString::from(token.into()));
        session
    }

    /// Install a bearer token, switching the session to authenticated.
    pub fn sign_in(&self, token: SecretString) {
        *self.write_state() = SessionState::Authenticated { token };
    }

    /// Drop the token and return to guest state.
    pub fn sign_out(&self) {
        *self.write_state() = SessionState::Guest;
    }

    /// Returns `true` if a bearer token is installed.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.read_state(), SessionState::Authenticated { .. })
    }

    /// The bearer token to attach to requests, if signed in.
    #[must_use]
    pub fn bearer_token(&self) -> Option<SecretString> {
        match &*self.read_state() {
            SessionState::Guest => None,
            SessionState::Authenticated { token } => Some(token.clone()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.read_state() {
            SessionState::Guest => f.debug_struct("AuthSession").field("state", &"Guest").finish(),
            SessionState::Authenticated { .. } => f
                .debug_struct("AuthSession")
                .field("state", &"Authenticated")
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults_to_guest() {
        let session = AuthSession::guest();
        assert!(!session.is_authenticated());
        assert!(session.bearer_token().is_none());
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = AuthSession::guest();
        session.sign_in(SecretString::from("tok_123"));
        assert!(session.is_authenticated());
        assert_eq!(session.bearer_token().unwrap().expose_secret(), "tok_123");

        session.sign_out();
        assert!(!session.is_authenticated());
        assert!(session.bearer_token().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let session = AuthSession::guest();
        let clone = session.clone();
        session.sign_in(SecretString::from("tok_456"));
        assert!(clone.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = AuthSession::with_token("super_secret_token");
        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
