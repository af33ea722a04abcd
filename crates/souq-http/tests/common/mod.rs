use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

use souq_core::ApiUrl;
use souq_http::{MarketClient, RefreshConfig};

/// Renewal tunables scaled down for tests; the keep-alive period stays long
/// so it never interferes unless a test opts in.
pub fn fast_config() -> RefreshConfig {
    RefreshConfig {
        cooldown: Duration::from_secs(1),
        wait_ceiling: Duration::from_millis(250),
        keepalive_interval: Duration::from_secs(60),
        redirect_delay: Duration::from_millis(20),
    }
}

/// A client pointed at the mock server with [`fast_config`].
pub fn client_for(server: &MockServer) -> MarketClient {
    client_with(server, fast_config())
}

/// A client pointed at the mock server with explicit tunables.
pub fn client_with(server: &MockServer, config: RefreshConfig) -> MarketClient {
    let base = ApiUrl::new(server.uri()).unwrap();
    MarketClient::builder(base)
        .refresh_config(config)
        .build()
        .unwrap()
}

/// A minimal user payload.
pub fn user_body(id: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "verified": true,
    })
}

/// A renewal response carrying only a token.
pub fn refresh_body(token: &str) -> Value {
    json!({ "token": token })
}
