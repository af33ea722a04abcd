//! souq-http - HTTP-backed marketplace session and API client.
//!
//! The pieces fit together as a small pipeline: [`CredentialHolder`] keeps
//! the short-lived access token in memory, the refresh coordinator renews it
//! through the ambient cookie (single-flight, cooldown-guarded), and the
//! transport attaches the token to every call and routes authorization
//! failures back through renewal. [`SessionBootstrapper`] hydrates the
//! reactive [`AuthSession`] once per process and keeps it alive.

mod bootstrap;
mod client;
mod credential;
pub mod endpoints;
mod refresh;
mod session;
mod transport;

pub use bootstrap::{KeepaliveGuard, SessionBootstrapper};
pub use client::{MarketClient, MarketClientBuilder};
pub use credential::CredentialHolder;
pub use refresh::RefreshConfig;
pub use session::AuthSession;
pub use transport::Call;
