//! Request interceptor pair: bearer attachment and 401-driven renewal.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use souq_core::{ApiUrl, AuthError, Error, InvalidInputError, LoginRedirect, Result};

use crate::credential::CredentialHolder;
use crate::endpoints;
use crate::refresh::RefreshCoordinator;

/// Renewal attempts allowed for a single failing-call chain.
const MAX_RENEWALS_PER_CALL: u8 = 2;

/// Prompt carried to the login surface on an unrecoverable auth failure.
const LOGIN_PROMPT: &str = "Please log in to continue";

/// A rebuildable description of an API call.
///
/// Calls are kept as data rather than built requests so a renewal can
/// reissue the original call with a fresh token attached.
#[derive(Clone, Debug)]
pub struct Call {
    method: Method,
    path: String,
    body: Option<Value>,
    strict: Option<bool>,
    origin: Option<String>,
}

impl Call {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            strict: None,
            origin: None,
        }
    }

    /// A GET call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT call.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A DELETE call.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|err| InvalidInputError::Body {
            reason: err.to_string(),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Force the strict-auth classification instead of the path-based
    /// default: strict calls redirect to the login surface when the session
    /// cannot be renewed.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Override the originating path reported on login redirects.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// The endpoint path this call targets.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn is_strict(&self) -> bool {
        self.strict
            .unwrap_or_else(|| endpoints::is_strict_path(&self.path))
    }

    fn origin_path(&self) -> &str {
        self.origin.as_deref().unwrap_or(&self.path)
    }
}

/// Wire shape of a structured API error body.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Executes calls with the token attached, coordinating renewal on 401s.
pub(crate) struct Transport {
    http: reqwest::Client,
    base: ApiUrl,
    credentials: CredentialHolder,
    refresher: Arc<RefreshCoordinator>,
    redirect: RwLock<Option<Arc<dyn LoginRedirect>>>,
    redirect_delay: Duration,
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        base: ApiUrl,
        credentials: CredentialHolder,
        refresher: Arc<RefreshCoordinator>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            http,
            base,
            credentials,
            refresher,
            redirect: RwLock::new(None),
            redirect_delay,
        }
    }

    /// Late-bind the login-surface navigation; registered by the
    /// bootstrapper once the host's routing capability exists.
    pub(crate) fn register_redirect(&self, redirect: Arc<dyn LoginRedirect>) {
        *self.redirect.write().unwrap() = Some(redirect);
    }

    /// Execute a call and deserialize the JSON response.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, call: Call) -> Result<T> {
        let resp = self.run(&call).await?;
        if resp.status().is_success() {
            resp.json::<T>().await.map_err(Error::transport)
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    /// Execute a call, discarding any response body.
    pub(crate) async fn execute_empty(&self, call: Call) -> Result<()> {
        let resp = self.run(&call).await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    /// Issue the call, renewing the token and reissuing on authorization
    /// failure.
    ///
    /// A 401 on anything but the renewal endpoint triggers one coordinated
    /// renewal (concurrent failures share a single in-flight call) and one
    /// reissue per renewal, bounded per failing chain. When renewal is
    /// impossible the original failure is surfaced, and strict-auth calls
    /// additionally schedule a navigation to the login surface.
    async fn run(&self, call: &Call) -> Result<Response> {
        let mut renewals = 0u8;
        loop {
            let resp = self.issue(call).await?;
            if resp.status() != StatusCode::UNAUTHORIZED || call.path == endpoints::REFRESH_TOKEN {
                return Ok(resp);
            }
            if renewals >= MAX_RENEWALS_PER_CALL {
                debug!(path = %call.path, "renewal budget exhausted, surfacing original failure");
                return Ok(resp);
            }
            renewals += 1;
            debug!(path = %call.path, attempt = renewals, "authorization failure, renewing access token");
            if self.refresher.refresh().await {
                continue;
            }
            if call.is_strict() {
                self.schedule_login_redirect(call);
            }
            return Ok(resp);
        }
    }

    /// Build and send one request, attaching the current token if present.
    async fn issue(&self, call: &Call) -> Result<Response> {
        let url = self.base.endpoint_url(&call.path);
        let mut request = self.http.request(call.method.clone(), url);
        if let Some(token) = self.credentials.get() {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }
        request.send().await.map_err(Error::transport)
    }

    /// Map a rejected response to an error, preferring the structured body.
    async fn api_error(resp: Response) -> Error {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return AuthError::SessionExpired.into();
        }
        let message = match resp.text().await {
            Ok(text) => serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Schedule navigation to the login surface, deferred so the failing
    /// caller observes its own outcome before the navigation fires.
    fn schedule_login_redirect(&self, call: &Call) {
        let Some(redirect) = self.redirect.read().unwrap().clone() else {
            debug!("no login redirect registered, skipping navigation");
            return;
        };
        let from = call.origin_path().to_owned();
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            redirect.redirect_to_login(&from, LOGIN_PROMPT).await;
        });
    }
}
