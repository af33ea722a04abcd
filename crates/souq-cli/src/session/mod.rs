//! CLI session context.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;

use souq_core::{ApiUrl, LoginRedirect};
use souq_http::{KeepaliveGuard, MarketClient, SessionBootstrapper};

/// A CLI invocation's client plus its persistable cookie jar.
///
/// Each invocation is a fresh load: the access token never survives between
/// commands, so authenticated commands hydrate through the bootstrap/renewal
/// path using the persisted long-lived cookie.
pub struct CliContext {
    pub client: MarketClient,
    pub api: ApiUrl,
    jar: Arc<CookieStoreMutex>,
    _keepalive: Option<KeepaliveGuard>,
}

impl CliContext {
    /// A fresh context with an empty jar, for login and registration.
    pub fn create(api: ApiUrl) -> Result<Self> {
        let jar = Arc::new(CookieStoreMutex::new(CookieStore::default()));
        let client = MarketClient::builder(api.clone())
            .cookie_provider(jar.clone())
            .build()
            .context("Failed to build client")?;
        Ok(Self {
            client,
            api,
            jar,
            _keepalive: None,
        })
    }

    /// Open the stored context without bootstrapping.
    pub fn open() -> Result<Self> {
        let stored = storage::load()
            .context("Failed to load session")?
            .context("No active session. Run 'souq login' first.")?;
        let api = ApiUrl::new(&stored.api).context("Invalid API URL in session")?;
        let client = MarketClient::builder(api.clone())
            .cookie_provider(stored.jar.clone())
            .build()
            .context("Failed to build client")?;
        Ok(Self {
            client,
            api,
            jar: stored.jar,
            _keepalive: None,
        })
    }

    /// Open the stored context and run the session bootstrap.
    pub async fn load() -> Result<Self> {
        let mut ctx = Self::open()?;
        let bootstrapper = SessionBootstrapper::new(ctx.client.clone());
        ctx._keepalive = Some(bootstrapper.run(Arc::new(CliRedirect)).await);
        // The renewal may have rotated the long-lived cookie.
        if let Err(err) = ctx.save() {
            tracing::warn!(error = %err, "failed to persist rotated cookie jar");
        }
        Ok(ctx)
    }

    /// Persist the API base URL and cookie jar.
    pub fn save(&self) -> Result<()> {
        storage::save(self.api.as_str(), &self.jar)
    }
}

/// Prints a login prompt instead of navigating; the CLI has no router.
pub struct CliRedirect;

#[async_trait]
impl LoginRedirect for CliRedirect {
    async fn redirect_to_login(&self, from: &str, message: &str) {
        eprintln!(
            "{} {}",
            "!".yellow(),
            format!("{message}: run 'souq login', then retry {from}").dimmed()
        );
    }
}
