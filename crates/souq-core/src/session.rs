//! Session state snapshot.

use crate::user::UserProfile;

/// A point-in-time view of the authentication session.
///
/// Consumers observe the state machine `Loading -> {Authenticated,
/// Unauthenticated}`: `loading` is true until the first bootstrap completes,
/// after which `is_authenticated` and `user` describe the session.
/// Authenticated can fall back to Unauthenticated at any time (logout,
/// failed renewal, failed user fetch).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// The current user, when authenticated.
    pub user: Option<UserProfile>,
    /// True iff the last credential-bearing operation succeeded and has not
    /// since been invalidated.
    pub is_authenticated: bool,
    /// True until the initial bootstrap settles.
    pub loading: bool,
    /// Most recent user-facing auth error, if any.
    pub error: Option<String>,
}

impl Default for SessionSnapshot {
    /// The initial Loading state.
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: true,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_loading_state() {
        let snapshot = SessionSnapshot::default();
        assert!(snapshot.loading);
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
        assert!(snapshot.error.is_none());
    }
}
