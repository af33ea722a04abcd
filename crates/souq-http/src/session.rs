//! Reactive auth session state.

use std::sync::Arc;

use tokio::sync::watch;

use souq_core::{SessionSnapshot, UserProfile};

/// Shared, observable session state.
///
/// Consumers read [`snapshot`](Self::snapshot) or
/// [`subscribe`](Self::subscribe) for change notifications. Mutation is
/// reserved for the refresh coordinator and the login/logout/profile
/// operations; everything else treats this as read-only.
#[derive(Clone, Debug)]
pub struct AuthSession {
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl AuthSession {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Returns the current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Returns true iff the session is currently authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated
    }

    /// Returns the current user, when authenticated.
    pub fn user(&self) -> Option<UserProfile> {
        self.tx.borrow().user.clone()
    }

    pub(crate) fn set_authenticated(&self, user: UserProfile) {
        self.tx.send_modify(|s| {
            s.user = Some(user);
            s.is_authenticated = true;
            s.error = None;
        });
    }

    /// Mark authenticated after a successful renewal, keeping the existing
    /// user when the renewal response carried none.
    pub(crate) fn merge_refreshed(&self, user: Option<UserProfile>) {
        self.tx.send_modify(|s| {
            if user.is_some() {
                s.user = user;
            }
            s.is_authenticated = true;
            s.error = None;
        });
    }

    pub(crate) fn set_unauthenticated(&self) {
        self.tx.send_modify(|s| {
            s.user = None;
            s.is_authenticated = false;
        });
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|s| s.error = Some(message));
    }

    pub(crate) fn finish_loading(&self) {
        self.tx.send_modify(|s| s.loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            display_name: None,
            bio: None,
            location: None,
            verified: false,
            created_at: None,
        }
    }

    #[test]
    fn authentication_transitions() {
        let session = AuthSession::new();
        assert!(session.snapshot().loading);
        assert!(!session.is_authenticated());

        session.set_authenticated(user("u1"));
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().id, "u1");

        session.set_unauthenticated();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn merge_keeps_user_when_renewal_carries_none() {
        let session = AuthSession::new();
        session.set_authenticated(user("u1"));

        session.merge_refreshed(None);
        assert_eq!(session.user().unwrap().id, "u1");

        session.merge_refreshed(Some(user("u2")));
        assert_eq!(session.user().unwrap().id, "u2");
    }

    #[test]
    fn subscribers_observe_changes() {
        let session = AuthSession::new();
        let rx = session.subscribe();

        session.finish_loading();
        assert!(!rx.borrow().loading);

        session.set_error("invalid credentials: email or password rejected");
        assert!(rx.borrow().error.is_some());
    }
}
