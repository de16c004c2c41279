mod common;

use axum::http::StatusCode;
use common::{login, register_user, send, test_app};
use counseling_scheduler::util::jwt::JwtTokenUtils;
use serde_json::json;

fn registration(username: &str, password: &str, id_number: &str) -> serde_json::Value {
    json!({
        "username": username,
        "password": password,
        "id_number": id_number,
        "birthdate": "2001-09-11"
    })
}

#[tokio::test]
async fn test_register_then_login() {
    let app = test_app();

    let (status, body) = send(&app.router, "POST", "/register", Some(registration("a", "123456", "X1")), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration successful! Please login.");
    let user_id = body["user_id"].as_str().unwrap().to_string();
    assert_eq!(user_id.len(), 24);
    assert_eq!(body["user"]["username"], "a");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("password").is_none());

    let (status, body) = send(
        &app.router,
        "POST",
        "/login",
        Some(json!({ "username": "a", "password": "123456" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["user_id"], user_id);
    assert_eq!(body["user"]["id_number"], "X1");

    let access = body["tokens"]["access_token"].as_str().unwrap();
    let claims = app.jwt_utils.validate_access_token(access).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_register_duplicate_username_conflict() {
    let app = test_app();
    register_user(&app.router, "a", "X1").await;

    let (status, body) = send(&app.router, "POST", "/register", Some(registration("a", "654321", "X2")), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn test_register_duplicate_id_number_conflict() {
    let app = test_app();
    register_user(&app.router, "first", "2020-00123").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/register",
        Some(registration("second", "123456", "2020-00123")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "ID number already registered");
}

#[tokio::test]
async fn test_concurrent_duplicate_registration_creates_one_account() {
    let app = test_app();
    let body = registration("racer", "123456", "R-1");

    let (first, second) = tokio::join!(
        send(&app.router, "POST", "/register", Some(body.clone()), None),
        send(&app.router, "POST", "/register", Some(body.clone()), None),
    );

    let mut statuses = vec![first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/register",
        Some(json!({ "username": "a", "password": "" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");
    assert_eq!(body["details"], "Missing fields: password, id_number, birthdate");
}

#[tokio::test]
async fn test_register_short_password() {
    let app = test_app();

    let (status, body) = send(&app.router, "POST", "/register", Some(registration("a", "12345", "X1")), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 6 characters long");

    // Nothing was stored, so the username is still free.
    register_user(&app.router, "a", "X1").await;
}

#[tokio::test]
async fn test_register_bad_birthdate() {
    let app = test_app();

    let mut body = registration("a", "123456", "X1");
    body["birthdate"] = json!("11/09/2001");
    let (status, body) = send(&app.router, "POST", "/register", Some(body), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid birthdate");
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = test_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let resp = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user() {
    let app = test_app();
    register_user(&app.router, "a", "X1").await;

    let (status, wrong_pw) = send(
        &app.router,
        "POST",
        "/login",
        Some(json!({ "username": "a", "password": "wrong" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = send(
        &app.router,
        "POST",
        "/login",
        Some(json!({ "username": "ghost", "password": "123456" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same answer either way so usernames cannot be guessed.
    assert_eq!(wrong_pw["message"], "Invalid username or password");
    assert_eq!(wrong_pw["message"], unknown["message"]);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = test_app();

    let (status, body) = send(&app.router, "POST", "/login", Some(json!({ "username": "a" })), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Missing fields: password");
}

#[tokio::test]
async fn test_get_user() {
    let app = test_app();
    let user_id = register_user(&app.router, "jdoe", "2019-555").await;

    let (status, body) = send(&app.router, "GET", &format!("/user/{}", user_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "jdoe");
    assert_eq!(body["user"]["birthdate"], "2000-01-01");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = test_app();

    let (status, body) = send(&app.router, "GET", "/user/65f1c0ffee0000000000abcd", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _) = send(&app.router, "GET", "/user/not-an-object-id", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_token() {
    let app = test_app();
    register_user(&app.router, "a", "X1").await;

    let (_, body) = send(
        &app.router,
        "POST",
        "/login",
        Some(json!({ "username": "a", "password": "123456" })),
        None,
    )
    .await;
    let refresh = body["tokens"]["refresh_token"].as_str().unwrap().to_string();
    let access = body["tokens"]["access_token"].as_str().unwrap().to_string();

    let (status, tokens) = send(
        &app.router,
        "POST",
        "/refresh-token",
        Some(json!({ "refresh_token": refresh })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.jwt_utils.validate_access_token(tokens["access_token"].as_str().unwrap()).is_ok());

    // An access token is not accepted in place of a refresh token.
    let (status, _) = send(
        &app.router,
        "POST",
        "/refresh-token",
        Some(json!({ "refresh_token": access })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_for_deleted_user_rejected() {
    let app = test_app();
    let refresh = app
        .jwt_utils
        .generate_refresh_token("65f1c0ffee0000000000abcd", "ghost", "user")
        .unwrap();

    let (status, body) = send(
        &app.router,
        "POST",
        "/refresh-token",
        Some(json!({ "refresh_token": refresh })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User no longer exists");
}

#[tokio::test]
async fn test_login_helper_returns_access_token() {
    let app = test_app();
    register_user(&app.router, "helper", "H-1").await;
    let token = login(&app.router, "helper", "123456").await;
    assert!(app.jwt_utils.validate_access_token(&token).is_ok());
}

#[tokio::test]
async fn test_admin_bootstrap_is_idempotent() {
    use counseling_scheduler::app::app::ensure_admin_user;
    use counseling_scheduler::config::AdminUserConfig;

    let app = test_app();
    let conf = AdminUserConfig {
        username: "counselor".to_string(),
        password: "admin-pass-123".to_string(),
        id_number: "ADMIN-0001".to_string(),
        birthdate: "1980-05-20".to_string(),
    };

    assert!(ensure_admin_user(&app.state.user_service, &conf).await.unwrap());
    assert!(!ensure_admin_user(&app.state.user_service, &conf).await.unwrap());

    // A student already holding the admin's ID number blocks the bootstrap.
    let other = test_app();
    register_user(&other.router, "student", "ADMIN-0001").await;
    assert!(!ensure_admin_user(&other.state.user_service, &conf).await.unwrap());

    let token = login(&app.router, "counselor", "admin-pass-123").await;
    let claims = app.jwt_utils.validate_access_token(&token).unwrap();
    assert_eq!(claims.role, "admin");
}
