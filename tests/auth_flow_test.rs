//! Login, registration and logout against a `wiremock` backend

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use solace::api::TOKEN_KEY;
use solace::auth::AuthSession;
use solace::error::SolaceError;

mod common;

fn auth_for(server: &MockServer) -> (AuthSession, Arc<dyn solace::KeyValueStore>) {
    let (client, store) = common::client_for(&server.uri());
    (AuthSession::new(Arc::new(client), store.clone()), store)
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({"username": "amy", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "tok-1",
            "user": {"id": 1, "username": "amy", "role": "user"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, store) = auth_for(&server);
    assert!(!auth.is_logged_in());

    let user = auth.login(" amy ", "pw").await.expect("login");
    assert_eq!(user.and_then(|u| u.username).as_deref(), Some("amy"));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    assert!(auth.is_logged_in());
}

#[tokio::test]
async fn test_rejected_login_keeps_no_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Wrong username or password"
        })))
        .mount(&server)
        .await;

    let (auth, store) = auth_for(&server);
    let err = auth.login("amy", "bad").await.unwrap_err();

    match err.downcast_ref::<SolaceError>() {
        Some(SolaceError::Authentication(msg)) => assert_eq!(msg, "Wrong username or password"),
        other => panic!("expected authentication error, got {:?}", other),
    }
    assert!(store.get(TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_blank_login_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (auth, _store) = auth_for(&server);
    assert!(auth.login("", "pw").await.is_err());
    assert!(auth
        .register("amy", "amy@example.org", "pw", "other")
        .await
        .is_err());
}

#[tokio::test]
async fn test_register_without_token_stays_logged_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/register"))
        .and(body_json(json!({
            "username": "amy",
            "password": "pw",
            "email": "amy@example.org"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, _store) = auth_for(&server);
    auth.register("amy", "amy@example.org", "pw", "pw")
        .await
        .expect("register");
    assert!(!auth.is_logged_in());
}

#[tokio::test]
async fn test_logout_clears_token_even_if_backend_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, store) = auth_for(&server);
    store.set(TOKEN_KEY, "tok-1").unwrap();

    auth.logout().await.expect("logout");
    assert!(store.get(TOKEN_KEY).unwrap().is_none());
    assert!(!auth.is_logged_in());
}
