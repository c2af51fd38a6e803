/// End-to-end tests over the HTTP router
///
/// Exercises the same router and middleware as production, with the
/// in-memory store implementations swapped in for Postgres and Redis.
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use authd::{
    app_router,
    db::InMemoryUserStore,
    security::{InMemoryRevocationStore, Jwt},
    services::AuthService,
    AppState,
};

const USERNAME: &str = "alice";
const EMAIL: &str = "alice@x.com";
const PASSWORD: &str = "Str0ng!Pass";

fn test_app() -> Router {
    let jwt = Jwt::new("integration-secret", "HS256", 30, 7, 0).unwrap();
    let auth = AuthService::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryRevocationStore::new()),
        Arc::new(jwt),
    );
    app_router(AppState { auth })
}

/// Fire one request at the app and return status plus parsed JSON body.
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": USERNAME, "email": EMAIL, "password": PASSWORD })),
    )
    .await
}

async fn login(app: &Router) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": USERNAME, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_register_login_profile_logout_flow() {
    let app = test_app();

    // Register
    let (status, body) = register(&app).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());

    // Duplicate username conflicts
    let (status, _) = register(&app).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Login
    let tokens = login(&app).await;
    let access = tokens["access_token"].as_str().unwrap();
    assert_eq!(tokens["token_type"], "bearer");
    assert!(tokens["refresh_token"].is_string());

    // Protected profile with the access token
    let (status, profile) =
        send(&app, Method::GET, "/users/profile", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], USERNAME);

    // Logout revokes the token
    let (status, body) = send(&app, Method::POST, "/auth/logout", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Same token is now rejected as revoked
    let (status, body) =
        send(&app, Method::GET, "/users/profile", Some(access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token has been revoked.");
}

#[tokio::test]
async fn test_refresh_flow() {
    let app = test_app();
    register(&app).await;
    let tokens = login(&app).await;
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/refresh-token",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let new_access = body["access_token"].as_str().unwrap();
    assert_ne!(new_access, access);

    // The fresh access token resolves to the same subject.
    let (status, profile) =
        send(&app, Method::GET, "/users/profile", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], USERNAME);
}

#[tokio::test]
async fn test_refresh_token_rejected_as_bearer() {
    let app = test_app();
    register(&app).await;
    let tokens = login(&app).await;
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let (status, body) =
        send(&app, Method::GET, "/users/profile", Some(refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token.");
}

#[tokio::test]
async fn test_login_failures_share_one_response() {
    let app = test_app();
    register(&app).await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": USERNAME, "password": "Wr0ng!Pass" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": PASSWORD })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/users/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        send(&app, Method::GET, "/users/profile", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_email_flow() {
    let app = test_app();
    register(&app).await;
    let tokens = login(&app).await;
    let access = tokens["access_token"].as_str().unwrap();

    let (_, profile) = send(&app, Method::GET, "/users/profile", Some(access), None).await;
    assert_eq!(profile["is_verified"], false);
    let verification_token = profile["verification_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/auth/verify-email?token={}", verification_token),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, profile) = send(&app, Method::GET, "/users/profile", Some(access), None).await;
    assert_eq!(profile["is_verified"], true);

    // Unknown verification tokens are rejected.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/verify-email?token=bogus",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile() {
    let app = test_app();
    register(&app).await;
    let tokens = login(&app).await;
    let access = tokens["access_token"].as_str().unwrap();

    let (status, profile) = send(
        &app,
        Method::PUT,
        "/users/profile",
        Some(access),
        Some(json!({ "full_name": "Alice Example" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["full_name"], "Alice Example");
    assert_eq!(profile["username"], USERNAME);
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app();

    // Invalid email
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": USERNAME, "email": "not-an-email", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Weak password
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": USERNAME, "email": EMAIL, "password": "weak" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
