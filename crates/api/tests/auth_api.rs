mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json, post_json_auth, video_body, TestApp};
use serde_json::json;

async fn signup(app: &TestApp, username: &str, email: &str) -> serde_json::Value {
    let body = json!({ "username": username, "email": email, "password": "hunter22" });
    let response = post_json(app.app(), "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn error_fields(json: &serde_json::Value) -> Vec<String> {
    json["errors"]
        .as_array()
        .expect("errors list")
        .iter()
        .map(|e| e["field"].as_str().expect("field name").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_returns_a_usable_token() {
    let app = build_test_app();
    let json = signup(&app, "alice", "alice@example.com").await;

    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert!(json["user"].get("passwordHash").is_none());
    assert!(json["user"].get("password_hash").is_none());

    let token = json["token"].as_str().expect("token");
    let response = post_json_auth(app.app(), "/api/videos", token, video_body("A")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let video = body_json(response).await;
    assert_eq!(video["createdBy"]["id"], json["user"]["id"]);
    assert_eq!(video["createdBy"]["username"], "alice");
}

#[tokio::test]
async fn signup_normalizes_email() {
    let app = build_test_app();
    let json = signup(&app, "alice", "  Alice@Example.COM ").await;
    assert_eq!(json["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn duplicate_signup_is_a_conflict() {
    let app = build_test_app();
    signup(&app, "alice", "alice@example.com").await;

    for body in [
        json!({ "username": "alice", "email": "other@example.com", "password": "hunter22" }),
        json!({ "username": "alice2", "email": "ALICE@example.com", "password": "hunter22" }),
    ] {
        let response = post_json(app.app(), "/api/auth/signup", body).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["message"], "User already exists");
        assert_eq!(json["code"], "CONFLICT");
    }
}

#[tokio::test]
async fn signup_validation_lists_each_field() {
    let app = build_test_app();

    let body = json!({ "username": "al", "email": "not-an-email", "password": "123" });
    let response = post_json(app.app(), "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let mut fields = error_fields(&json);
    fields.sort();
    assert_eq!(fields, vec!["email", "password", "username"]);
}

#[tokio::test]
async fn signup_with_empty_body_is_rejected() {
    let app = build_test_app();

    let response = post_json(app.app(), "/api/auth/signup", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(error_fields(&json).len(), 3);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_succeeds_with_any_email_case() {
    let app = build_test_app();
    let registered = signup(&app, "bob", "bob@example.com").await;

    let body = json!({ "email": "BOB@Example.com", "password": "hunter22" });
    let response = post_json(app.app(), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], registered["user"]["id"]);
    let token = json["token"].as_str().expect("token");

    let response = post_json_auth(app.app(), "/api/videos", token, video_body("B")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let app = build_test_app();
    signup(&app, "bob", "bob@example.com").await;

    for body in [
        json!({ "email": "bob@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": "hunter22" }),
    ] {
        let response = post_json(app.app(), "/api/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let app = build_test_app();

    let response = post_json(app.app(), "/api/auth/login", json!({ "email": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let mut fields = error_fields(&body_json(response).await);
    fields.sort();
    assert_eq!(fields, vec!["email", "password"]);
}
