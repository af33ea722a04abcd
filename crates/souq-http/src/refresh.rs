//! Single-flight renewal of the access token.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use souq_core::{AccessToken, ApiUrl, UserProfile};

use crate::credential::CredentialHolder;
use crate::endpoints;
use crate::session::AuthSession;

/// Tunables for the renewal protocol.
#[derive(Clone, Debug)]
pub struct RefreshConfig {
    /// Minimum interval between renewal attempts; requests inside the window
    /// resolve negatively without touching the network.
    pub cooldown: Duration,
    /// How long a concurrent caller waits on an in-flight renewal before
    /// giving up (the renewal itself is not cancelled).
    pub wait_ceiling: Duration,
    /// Period of the background keep-alive check.
    pub keepalive_interval: Duration,
    /// Delay before navigating to the login surface after a failed renewal.
    pub redirect_delay: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(5000),
            wait_ceiling: Duration::from_secs(5),
            keepalive_interval: Duration::from_secs(300),
            redirect_delay: Duration::from_millis(100),
        }
    }
}

/// Renewal bookkeeping shared by all callers.
#[derive(Default)]
struct RefreshState {
    in_progress: bool,
    last_attempt: Option<Instant>,
    waiters: Vec<oneshot::Sender<bool>>,
}

/// Wire shape of a successful renewal response.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Serializes access-token renewal into a single network call.
///
/// Concurrent callers share one in-flight renewal and observe the same
/// outcome, in FIFO order; the cooldown absorbs renewal storms from
/// near-simultaneous authorization failures. Expected failures are signalled
/// by `false`, never by an error.
pub(crate) struct RefreshCoordinator {
    http: reqwest::Client,
    base: ApiUrl,
    cookies: Arc<dyn reqwest::cookie::CookieStore>,
    credentials: CredentialHolder,
    session: AuthSession,
    config: RefreshConfig,
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub(crate) fn new(
        http: reqwest::Client,
        base: ApiUrl,
        cookies: Arc<dyn reqwest::cookie::CookieStore>,
        credentials: CredentialHolder,
        session: AuthSession,
        config: RefreshConfig,
    ) -> Self {
        Self {
            http,
            base,
            cookies,
            credentials,
            session,
            config,
            state: Mutex::new(RefreshState::default()),
        }
    }

    /// Renew the access token, returning whether a valid token is now held.
    ///
    /// At most one renewal call is on the wire at any instant: the flag check
    /// and set happen under one lock acquisition with no await between them,
    /// so near-simultaneous callers cannot both become the initiator.
    pub(crate) async fn refresh(&self) -> bool {
        let waiter = {
            let mut state = self.state.lock().unwrap();
            if state.in_progress {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Some(rx)
            } else if state
                .last_attempt
                .is_some_and(|at| at.elapsed() < self.config.cooldown)
            {
                debug!("renewal suppressed by cooldown");
                return false;
            } else {
                state.in_progress = true;
                state.last_attempt = Some(Instant::now());
                None
            }
        };

        if let Some(rx) = waiter {
            return match tokio::time::timeout(self.config.wait_ceiling, rx).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_)) => false,
                Err(_) => {
                    debug!("gave up waiting on in-flight renewal");
                    false
                }
            };
        }

        // Initiator: waiters are settled even if this task is dropped
        // mid-renewal, so nobody wedges on a stale in-progress flag.
        let mut settle = Settle {
            coordinator: self,
            outcome: false,
        };
        let outcome = self.perform().await;
        settle.outcome = outcome;
        drop(settle);
        outcome
    }

    /// Perform the single network renewal call and apply its outcome.
    async fn perform(&self) -> bool {
        self.log_cookie_hint();

        let url = self.base.endpoint_url(endpoints::REFRESH_TOKEN);
        // The long-lived credential rides along as an ambient cookie; its
        // value is never read or attached by this code.
        match self.http.post(url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<RefreshResponse>().await {
                Ok(body) => {
                    self.credentials.set(AccessToken::new(body.token));
                    self.session.merge_refreshed(body.user);
                    info!("access token renewed");
                    true
                }
                Err(err) => {
                    warn!(error = %err, "renewal response malformed");
                    self.invalidate();
                    false
                }
            },
            Ok(resp) => {
                warn!(status = %resp.status(), "renewal rejected");
                self.invalidate();
                false
            }
            Err(err) => {
                warn!(error = %err, "renewal transport error");
                self.invalidate();
                false
            }
        }
    }

    fn invalidate(&self) {
        self.credentials.clear();
        self.session.set_unauthenticated();
    }

    /// Advisory check for a refresh cookie in the jar.
    ///
    /// HTTP-only or host-scoped cookies may be invisible here, so the result
    /// never gates whether the renewal is attempted.
    fn log_cookie_hint(&self) {
        let visible = self
            .cookies
            .cookies(self.base.as_url())
            .and_then(|header| header.to_str().map(str::to_owned).ok());
        match visible {
            Some(header) if header.to_ascii_lowercase().contains("refresh") => {
                debug!("refresh cookie visible in jar");
            }
            Some(_) => debug!("no refresh-named cookie visible in jar"),
            None => debug!("no cookies visible for api origin"),
        }
    }
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("base", &self.base)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Clears the in-progress flag and releases waiters on drop.
struct Settle<'a> {
    coordinator: &'a RefreshCoordinator,
    outcome: bool,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        let waiters = {
            let mut state = self.coordinator.state.lock().unwrap();
            state.in_progress = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(self.outcome);
        }
    }
}
