//! Marketplace client facade.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use souq_core::{
    AccessToken, ApiUrl, AuthError, Credentials, Error, LoginRedirect, ProfileUpdate, Result,
    UserProfile,
};

use crate::credential::CredentialHolder;
use crate::endpoints;
use crate::refresh::{RefreshConfig, RefreshCoordinator};
use crate::session::AuthSession;
use crate::transport::{Call, Transport};

/// Request body for login.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response from login.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    user: UserProfile,
}

/// Request body for registration.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

/// Response from registration.
#[derive(Debug, serde::Deserialize)]
struct RegisterResponse {
    user: UserProfile,
}

/// A marketplace API client with managed session state.
///
/// Owns the credential holder, the reactive session, the refresh
/// coordinator, and the transport, wired together at construction so no
/// global state exists; cloning yields handles to the same session.
#[derive(Clone)]
pub struct MarketClient {
    base: ApiUrl,
    credentials: CredentialHolder,
    session: AuthSession,
    refresher: Arc<RefreshCoordinator>,
    transport: Arc<Transport>,
    config: RefreshConfig,
}

impl MarketClient {
    /// Create a client with default configuration and an in-memory cookie
    /// jar.
    pub fn new(base: ApiUrl) -> Result<Self> {
        Self::builder(base).build()
    }

    /// Start building a client.
    pub fn builder(base: ApiUrl) -> MarketClientBuilder {
        MarketClientBuilder {
            base,
            config: RefreshConfig::default(),
            cookies: None,
        }
    }

    /// The API base URL.
    pub fn api_url(&self) -> &ApiUrl {
        &self.base
    }

    /// Handle to the reactive session state.
    pub fn session(&self) -> AuthSession {
        self.session.clone()
    }

    /// Handle to the access-token holder.
    pub fn credentials(&self) -> CredentialHolder {
        self.credentials.clone()
    }

    pub(crate) fn refresh_config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Register the login-surface navigation used on unrecoverable auth
    /// failures for strict calls.
    pub fn register_redirect(&self, redirect: Arc<dyn LoginRedirect>) {
        self.transport.register_redirect(redirect);
    }

    /// Renew the access token now; `false` means no valid token is held.
    ///
    /// Concurrent calls share a single renewal; calls inside the cooldown
    /// window resolve `false` without a network round trip.
    pub async fn refresh(&self) -> bool {
        self.refresher.refresh().await
    }

    /// Authenticate and start a session.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };
        let call = Call::post(endpoints::LOGIN).json(&request)?;
        match self.transport.execute::<LoginResponse>(call).await {
            Ok(body) => {
                self.credentials.set(AccessToken::new(body.token));
                self.session.set_authenticated(body.user.clone());
                info!(user = %body.user.id, "logged in");
                Ok(body.user)
            }
            Err(Error::Api {
                status: 400 | 403,
                message,
            }) => {
                let err = AuthError::InvalidCredentials(message);
                self.session.set_error(err.to_string());
                Err(err.into())
            }
            Err(Error::Auth(_)) => {
                let err = AuthError::InvalidCredentials("email or password rejected".to_string());
                self.session.set_error(err.to_string());
                Err(err.into())
            }
            Err(err) => Err(err),
        }
    }

    /// Create a new account.
    ///
    /// Registration does not authenticate: the account logs in (after any
    /// verification step) through [`login`](Self::login).
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile> {
        let request = RegisterRequest {
            email,
            password,
            display_name,
        };
        let call = Call::post(endpoints::REGISTER).json(&request)?;
        let body: RegisterResponse = self.transport.execute(call).await?;
        info!(user = %body.user.id, "account registered");
        Ok(body.user)
    }

    /// End the session.
    ///
    /// The in-memory token and session state are cleared even when the
    /// server-side invalidation fails; the failure is still returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .transport
            .execute_empty(Call::post(endpoints::LOGOUT))
            .await;
        self.credentials.clear();
        self.session.set_unauthenticated();
        info!("logged out");
        result
    }

    /// Fetch the current user and populate the session state.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<UserProfile> {
        let user: UserProfile = self.transport.execute(Call::get(endpoints::ME)).await?;
        self.session.set_authenticated(user.clone());
        Ok(user)
    }

    /// Fetch the full profile (strict-auth).
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile> {
        let user: UserProfile = self
            .transport
            .execute(Call::get(endpoints::PROFILE_COMPLETE))
            .await?;
        self.session.set_authenticated(user.clone());
        Ok(user)
    }

    /// Update profile fields (strict-auth) and merge the result into the
    /// session state.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        let call = Call::put(endpoints::PROFILE).json(update)?;
        let user: UserProfile = self.transport.execute(call).await?;
        self.session.set_authenticated(user.clone());
        Ok(user)
    }

    /// Execute an arbitrary call through the interceptor pair.
    ///
    /// Escape hatch for collaborators outside this crate (listing views and
    /// the like); the call still gets bearer attachment, renewal-on-401, and
    /// strict-auth handling.
    pub async fn execute<T: DeserializeOwned>(&self, call: Call) -> Result<T> {
        self.transport.execute(call).await
    }

    /// Execute an arbitrary call, discarding the response body.
    pub async fn execute_empty(&self, call: Call) -> Result<()> {
        self.transport.execute_empty(call).await
    }
}

/// Sized adapter so an `Arc<dyn CookieStore>` can be handed to reqwest's
/// `cookie_provider`, which requires a `Sized` type parameter. Forwards both
/// trait methods to the inner store unchanged.
struct DynCookieStore(Arc<dyn CookieStore>);

impl CookieStore for DynCookieStore {
    fn set_cookies(
        &self,
        cookie_headers: &mut dyn Iterator<Item = &reqwest::header::HeaderValue>,
        url: &reqwest::Url,
    ) {
        self.0.set_cookies(cookie_headers, url)
    }

    fn cookies(&self, url: &reqwest::Url) -> Option<reqwest::header::HeaderValue> {
        self.0.cookies(url)
    }
}

/// Builder for [`MarketClient`].
pub struct MarketClientBuilder {
    base: ApiUrl,
    config: RefreshConfig,
    cookies: Option<Arc<dyn CookieStore>>,
}

impl MarketClientBuilder {
    /// Override the renewal tunables.
    pub fn refresh_config(mut self, config: RefreshConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a caller-supplied cookie store (e.g. a persistable jar) for the
    /// ambient long-lived credential.
    pub fn cookie_provider<C>(mut self, provider: Arc<C>) -> Self
    where
        C: CookieStore + 'static,
    {
        self.cookies = Some(provider);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<MarketClient> {
        let cookies: Arc<dyn CookieStore> = match self.cookies {
            Some(provider) => provider,
            None => Arc::new(Jar::default()),
        };
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::new(DynCookieStore(Arc::clone(&cookies))))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(Error::transport)?;

        // Session state first, then the coordinator, then the transport:
        // each layer receives plain handles to the ones before it.
        let credentials = CredentialHolder::new();
        let session = AuthSession::new();
        let refresher = Arc::new(RefreshCoordinator::new(
            http.clone(),
            self.base.clone(),
            cookies,
            credentials.clone(),
            session.clone(),
            self.config.clone(),
        ));
        let transport = Arc::new(Transport::new(
            http,
            self.base.clone(),
            credentials.clone(),
            Arc::clone(&refresher),
            self.config.redirect_delay,
        ));

        Ok(MarketClient {
            base: self.base,
            credentials,
            session,
            refresher,
            transport,
            config: self.config,
        })
    }
}
