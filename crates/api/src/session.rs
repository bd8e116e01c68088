//! Explicit session context shared by the client and the app.

use std::sync::{Arc, RwLock};

/// Holds the bearer token of the signed-in user.
///
/// Cheap to clone; all clones observe the same token, so the app can refresh
/// it on login/logout without rebuilding the [`Client`](crate::Client).
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Creates a session, optionally already signed in.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.filter(|t| !t.is_empty()))),
        }
    }

    /// Current bearer token, if signed in.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether a token is present. Says nothing about its validity.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Replaces the token after a login.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        *self.token.write().unwrap_or_else(|e| e.into_inner()) =
            Some(token).filter(|t| !t.is_empty());
    }

    /// Drops the token on logout or failed verification.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_without_token() {
        let s = Session::new(None);
        assert!(!s.is_authenticated());
        assert!(s.token().is_none());
    }

    #[test]
    fn empty_token_is_anonymous() {
        assert!(!Session::new(Some(String::new())).is_authenticated());
    }

    #[test]
    fn clones_share_token() {
        let s = Session::default();
        let clone = s.clone();
        s.set_token("tok");
        assert_eq!(clone.token().as_deref(), Some("tok"));
        clone.clear();
        assert!(!s.is_authenticated());
    }
}
