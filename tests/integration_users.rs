//! User registration integration tests
//!
//! Tests the registration endpoint over HTTP:
//! - Field validation and its error messages
//! - Duplicate detection
//! - Response body hygiene

mod common;

use common::*;
use reqwest::StatusCode;

/// Test 1: Valid registration answers 201 with the stored user
#[tokio::test]
async fn test_register_valid_user() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/users", addr))
        .json(&serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "secret123",
            "bio": "I lift things"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["bio"], "I lift things");
    assert!(body["user"]["id"].as_i64().unwrap() > 0);
}

/// Test 2: The password never appears in the response
#[tokio::test]
async fn test_register_response_omits_password() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let response = register_user(&client, addr, "alice", "secret123").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let text = response.text().await.unwrap();
    assert!(!text.contains("secret123"));
    assert!(!text.contains("password"));
}

/// Test 3: Validation failures answer 400 with the first failing message
#[tokio::test]
async fn test_register_validation_messages() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let cases = vec![
        (
            serde_json::json!({ "email": "a@example.com", "password": "x" }),
            "Username is required",
        ),
        (
            serde_json::json!({ "username": "a".repeat(51), "email": "a@example.com", "password": "x" }),
            "Username cannot be greater than 50 characters",
        ),
        (
            serde_json::json!({ "username": "alice", "password": "x" }),
            "Email is required",
        ),
        (
            serde_json::json!({ "username": "alice", "email": "no-at-sign", "password": "x" }),
            "Invalid email format",
        ),
        (
            serde_json::json!({ "username": "alice", "email": "alice@nodotstld", "password": "x" }),
            "Invalid email format",
        ),
        (
            serde_json::json!({ "username": "alice", "email": "a@example.com" }),
            "Password is required",
        ),
    ];

    for (payload, expected) in cases {
        let response = client
            .post(format!("http://{}/users", addr))
            .json(&payload)
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", expected);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], expected);
    }
}

/// Test 4: A username of exactly 50 characters is accepted
#[tokio::test]
async fn test_register_username_at_limit() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/users", addr))
        .json(&serde_json::json!({
            "username": "a".repeat(50),
            "email": "long@example.com",
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Test 5: Reusing a username answers 400, not 500
#[tokio::test]
async fn test_register_duplicate_username() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let first = register_user(&client, addr, "alice", "secret123").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("http://{}/users", addr))
        .json(&serde_json::json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["error"], "Username or email already taken");
}

/// Test 6: Reusing an email answers 400 with the same message
#[tokio::test]
async fn test_register_duplicate_email() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let first = register_user(&client, addr, "alice", "secret123").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("http://{}/users", addr))
        .json(&serde_json::json!({
            "username": "bob",
            "email": "alice@example.com",
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["error"], "Username or email already taken");
}

/// Test 7: A syntactically broken body answers 400 Invalid request
#[tokio::test]
async fn test_register_invalid_body() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/users", addr))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request");
}

/// Test 8: A registered user can immediately log in
#[tokio::test]
async fn test_register_then_login() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let client = reqwest::Client::new();
    let token = register_and_login(&client, addr, "alice", "secret123").await;
    assert!(token.starts_with("ll_"));
}
