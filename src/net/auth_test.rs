use super::*;
use crate::net::api::Method;
use crate::test_helpers::{MockClient, allow_csrf, http_error, payload, user_body};
use serde_json::json;

fn gateway(client: &Rc<MockClient>) -> AuthGateway {
    AuthGateway::new(client.clone(), AuthEndpoints::default())
}

// =============================================================
// Anti-forgery pre-step
// =============================================================

#[tokio::test]
async fn login_acquires_anti_forgery_token_first() {
    let client = MockClient::new();
    allow_csrf(&client);
    client.on(Method::Post, "/api/login", Ok(json!({"message": "ok"})));

    let creds = payload(json!({"email": "a@x.com", "password": "secret"}));
    gateway(&client).login(&creds).await.unwrap();

    assert_eq!(client.calls(), vec!["GET /sanctum/csrf-cookie", "POST /api/login"]);
    assert_eq!(client.requests()[1].body, Some(json!({"email": "a@x.com", "password": "secret"})));
}

#[tokio::test]
async fn register_and_password_reset_acquire_anti_forgery_token_first() {
    let client = MockClient::new();
    allow_csrf(&client);
    client.on(Method::Post, "/api/register", Ok(Value::Null));
    client.on(Method::Post, "/api/forgot-password", Ok(json!({"message": "sent"})));
    client.on(Method::Post, "/api/reset-password", Ok(Value::Null));
    let gw = gateway(&client);

    gw.register(&payload(json!({"name": "Ada"}))).await.unwrap();
    gw.request_password_reset(&payload(json!({"email": "a@x.com"}))).await.unwrap();
    gw.reset_password(&payload(json!({"token": "t"}))).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![
            "GET /sanctum/csrf-cookie",
            "POST /api/register",
            "GET /sanctum/csrf-cookie",
            "POST /api/forgot-password",
            "GET /sanctum/csrf-cookie",
            "POST /api/reset-password",
        ]
    );
}

#[tokio::test]
async fn logout_and_current_user_skip_anti_forgery() {
    let client = MockClient::new();
    client.on(Method::Post, "/api/logout", Ok(Value::Null));
    client.on(Method::Get, "/api/user", Ok(user_body(1, "ada")));
    let gw = gateway(&client);

    gw.logout().await.unwrap();
    let identity = gw.current_user().await.unwrap();

    assert_eq!(identity.id, "1");
    assert_eq!(client.calls(), vec!["POST /api/logout", "GET /api/user"]);
}

#[tokio::test]
async fn anti_forgery_failure_stops_submission() {
    let client = MockClient::new();
    client.on(Method::Get, "/sanctum/csrf-cookie", Err(http_error(500, Value::Null)));

    let err = gateway(&client)
        .login(&payload(json!({"email": "a@x.com"})))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Transient { status: Some(500), .. }));
    assert_eq!(client.calls(), vec!["GET /sanctum/csrf-cookie"]);
}

// =============================================================
// Failure classification
// =============================================================

#[tokio::test]
async fn login_401_uses_server_message() {
    let client = MockClient::new();
    allow_csrf(&client);
    client.on(
        Method::Post,
        "/api/login",
        Err(http_error(401, json!({"message": "Invalid credentials"}))),
    );

    let err = gateway(&client)
        .login(&payload(json!({"email": "a@x.com", "password": "bad"})))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::AuthorizationDenied { message: "Invalid credentials".to_owned() });
}

#[tokio::test]
async fn login_419_is_not_retried() {
    let client = MockClient::new();
    allow_csrf(&client);
    client.on(Method::Post, "/api/login", Err(http_error(419, json!({}))));

    let err = gateway(&client).login(&Payload::new()).await.unwrap_err();

    assert_eq!(err, AuthError::AntiForgeryMismatch { message: LOGIN_FAILED.to_owned() });
    assert_eq!(client.calls().len(), 2);
}

#[tokio::test]
async fn register_422_surfaces_field_errors() {
    let client = MockClient::new();
    allow_csrf(&client);
    client.on(
        Method::Post,
        "/api/register",
        Err(http_error(
            422,
            json!({"message": "The email has already been taken.", "errors": {"email": ["The email has already been taken."]}}),
        )),
    );

    let err = gateway(&client).register(&Payload::new()).await.unwrap_err();

    assert_eq!(err.to_string(), "The email has already been taken.");
    assert_eq!(err.field_errors().unwrap()["email"].len(), 1);
}

#[tokio::test]
async fn current_user_without_session_is_denied() {
    let client = MockClient::new();
    client.on(Method::Get, "/api/user", Err(http_error(401, json!({"message": "Unauthenticated."}))));

    let err = gateway(&client).current_user().await.unwrap_err();

    assert!(err.is_authorization_denied());
    assert_eq!(err.to_string(), "Unauthenticated.");
}

#[tokio::test]
async fn current_user_with_garbage_body_is_decode_error() {
    let client = MockClient::new();
    client.on(Method::Get, "/api/user", Ok(json!({"data": []})));

    let err = gateway(&client).current_user().await.unwrap_err();

    assert!(matches!(err, AuthError::Decode(_)));
}

#[tokio::test]
async fn current_user_network_failure_falls_back_to_generic_message() {
    let client = MockClient::new();
    client.on(Method::Get, "/api/user", Err(HttpError { status: None, body: Value::Null }));

    let err = gateway(&client).current_user().await.unwrap_err();

    assert_eq!(err, AuthError::Transient { status: None, message: FETCH_USER_FAILED.to_owned() });
}
