//! Integration tests for customer signup, login, and profiles.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (mp-cli migrate)
//! - The API server running (cargo run -p marketplace-api)

use marketplace_integration_tests::{TestClient, unique_username};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_health() {
    let ctx = TestClient::new();
    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("Failed to reach server");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_signup_hides_password() {
    let ctx = TestClient::new();
    let username = unique_username("profile");

    let profile = ctx.signup(&username, "s3cret").await;

    assert_eq!(profile["username"], username.as_str());
    assert_eq!(profile["firstname"], "Test");
    assert!(profile.get("password").is_none());
    assert!(profile.get("passwordHash").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_signup_conflicts() {
    let ctx = TestClient::new();
    let username = unique_username("dup");
    ctx.signup(&username, "one").await;

    let resp = ctx
        .client
        .post(ctx.url("/customers/signup"))
        .json(&json!({ "username": username, "password": "two" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_flows() {
    let ctx = TestClient::new();
    let username = unique_username("login");
    ctx.signup(&username, "right").await;

    let resp = ctx
        .client
        .post(ctx.url("/customers/login"))
        .json(&json!({ "username": username, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx
        .client
        .post(ctx.url("/customers/login"))
        .json(&json!({ "username": unique_username("ghost"), "password": "x" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let token = ctx.login(&username, "right").await;
    let me: Value = ctx
        .client
        .get(ctx.url("/customers/me"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    assert_eq!(me["username"], username.as_str());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_customer_by_id() {
    let ctx = TestClient::new();
    let (profile, token) = ctx.customer_with_token("byid").await;
    let id = profile["id"].as_i64().expect("profile has an id");

    let resp = ctx
        .client
        .get(ctx.url(&format!("/customers/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(ctx.url("/customers/2147483647"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
