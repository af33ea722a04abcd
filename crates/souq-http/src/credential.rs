//! In-memory storage for the short-lived access token.

use std::sync::{Arc, RwLock};

use souq_core::AccessToken;

/// Process-wide holder for the current access token.
///
/// The token is never persisted; it lives only for the life of the process,
/// so a fresh process always goes through the renewal path. Cloning yields a
/// handle to the same underlying slot. Writes happen only from the refresh
/// coordinator and the login/logout operations.
#[derive(Clone, Debug, Default)]
pub struct CredentialHolder {
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl CredentialHolder {
    /// Create an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a token, replacing any existing one.
    pub fn set(&self, token: AccessToken) {
        *self.token.write().unwrap() = Some(token);
    }

    /// Returns the current token, if any.
    pub fn get(&self) -> Option<AccessToken> {
        self.token.read().unwrap().clone()
    }

    /// Drop the current token.
    pub fn clear(&self) {
        *self.token.write().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let holder = CredentialHolder::new();
        assert!(holder.get().is_none());

        holder.set(AccessToken::new("tok-1"));
        assert_eq!(holder.get().unwrap().as_str(), "tok-1");

        holder.set(AccessToken::new("tok-2"));
        assert_eq!(holder.get().unwrap().as_str(), "tok-2");

        holder.clear();
        assert!(holder.get().is_none());
    }

    #[test]
    fn clones_share_the_slot() {
        let holder = CredentialHolder::new();
        let other = holder.clone();

        holder.set(AccessToken::new("shared"));
        assert_eq!(other.get().unwrap().as_str(), "shared");

        other.clear();
        assert!(holder.get().is_none());
    }
}
