//! Login-surface navigation trait.

use async_trait::async_trait;

/// Navigation to the host application's login surface.
///
/// The capability does not exist until the host's router (or equivalent) is
/// up, so implementations are registered late by the session bootstrapper.
/// Invoked when a strict-auth call fails and the session cannot be renewed.
#[async_trait]
pub trait LoginRedirect: Send + Sync {
    /// Navigate to the login surface.
    ///
    /// `from` is the originating path so the user can be returned there
    /// after authenticating; `message` is a human-readable prompt.
    async fn redirect_to_login(&self, from: &str, message: &str);
}
