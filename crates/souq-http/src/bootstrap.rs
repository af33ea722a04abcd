//! One-shot session bootstrap and background keep-alive.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use souq_core::LoginRedirect;

use crate::client::MarketClient;

/// Hydrates the session once per application load and keeps it alive.
pub struct SessionBootstrapper {
    client: MarketClient,
}

impl SessionBootstrapper {
    /// Create a bootstrapper for the given client.
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    /// Run the bootstrap sequence and start the keep-alive task.
    ///
    /// Registers the login-surface navigation, hydrates the session from an
    /// existing token or a single renewal, and clears the loading flag
    /// whatever the outcome: absence of a session is not an error. The
    /// returned guard cancels the keep-alive task when dropped, so timers
    /// never outlive the session boundary that started them.
    #[instrument(skip_all)]
    pub async fn run(&self, redirect: Arc<dyn LoginRedirect>) -> KeepaliveGuard {
        self.client.register_redirect(redirect);

        self.hydrate().await;
        self.client.session().finish_loading();

        let client = self.client.clone();
        let period = self.client.refresh_config().keepalive_interval;
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if client.session().snapshot().loading {
                    continue;
                }
                if client.credentials().get().is_none() {
                    // Best-effort: a failure here stays invisible.
                    let renewed = client.refresh().await;
                    debug!(renewed, "keep-alive renewal attempt");
                }
            }
        });

        KeepaliveGuard { handle }
    }

    /// Populate the session from an in-memory token, or from one renewal
    /// when none is held. Errors are swallowed: they only mean there is no
    /// session to restore.
    async fn hydrate(&self) {
        if self.client.credentials().get().is_some() {
            if let Err(err) = self.client.current_user().await {
                debug!(error = %err, "session hydration failed");
            }
        } else if self.client.refresh().await {
            if let Err(err) = self.client.current_user().await {
                debug!(error = %err, "user fetch after renewal failed");
            }
        }
    }
}

/// Cancels the keep-alive task when dropped.
#[derive(Debug)]
pub struct KeepaliveGuard {
    handle: JoinHandle<()>,
}

impl Drop for KeepaliveGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
