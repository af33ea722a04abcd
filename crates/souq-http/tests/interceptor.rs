//! Interceptor-pair tests: retry with a renewed token, renewal budget,
//! strict-auth redirects.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, refresh_body, user_body};
use souq_core::{AccessToken, AuthError, Error, LoginRedirect};
use souq_http::Call;

/// Records redirect invocations for assertions.
#[derive(Default)]
struct RecordingRedirect {
    seen: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl LoginRedirect for RecordingRedirect {
    async fn redirect_to_login(&self, from: &str, message: &str) {
        self.seen
            .lock()
            .unwrap()
            .push((from.to_string(), message.to_string()));
    }
}

#[tokio::test]
async fn retries_once_with_renewed_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .named("stale token rejected")
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("u1")))
        .expect(1)
        .named("fresh token accepted")
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refresh_body("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.credentials().set(AccessToken::new("stale"));

    let user = client.current_user().await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(client.credentials().get().unwrap().as_str(), "fresh");
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn concurrent_authorization_failures_share_one_renewal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1..=4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("u1")))
        .expect(4)
        .named("every caller replays with the new token")
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(refresh_body("fresh"))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .named("single renewal on the wire")
        .mount(&server)
        .await;

    let mut config = common::fast_config();
    config.wait_ceiling = Duration::from_secs(2);
    let client = common::client_with(&server, config);
    client.credentials().set(AccessToken::new("stale"));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.current_user().await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().id, "u1");
    }
    assert_eq!(client.credentials().get().unwrap().as_str(), "fresh");
}

#[tokio::test]
async fn renewal_budget_bounds_a_failing_chain() {
    let server = MockServer::start().await;
    // The endpoint rejects even the renewed token.
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    // One real renewal; the second attempt falls into the cooldown.
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refresh_body("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.credentials().set(AccessToken::new("stale"));

    let err = client.current_user().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::SessionExpired)));
}

#[tokio::test]
async fn strict_call_redirects_to_login_on_failed_renewal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/profile/complete"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let redirect = Arc::new(RecordingRedirect::default());
    client.register_redirect(redirect.clone());
    client.credentials().set(AccessToken::new("stale"));

    let err = client.profile().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::SessionExpired)));

    // The navigation is deferred past the failure.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let seen = redirect.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "/api/user/profile/complete");
    assert!(!seen[0].1.is_empty());
}

#[tokio::test]
async fn non_strict_call_does_not_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let redirect = Arc::new(RecordingRedirect::default());
    client.register_redirect(redirect.clone());
    client.credentials().set(AccessToken::new("stale"));

    assert!(client.current_user().await.is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(redirect.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn per_call_flag_overrides_path_classification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/export"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let redirect = Arc::new(RecordingRedirect::default());
    client.register_redirect(redirect.clone());

    let call = Call::get("/api/export")
        .strict(true)
        .origin("/account/export");
    let err = client.execute::<serde_json::Value>(call).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::SessionExpired)));

    tokio::time::sleep(Duration::from_millis(100)).await;
    let seen = redirect.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "/account/export");
}
