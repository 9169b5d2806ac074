//! Integration tests for the marketplace API.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p marketplace-cli -- migrate
//! cargo run -p marketplace-api
//!
//! # Run the ignored integration tests against it
//! cargo test -p marketplace-integration-tests -- --ignored
//! ```
//!
//! The server address comes from `MARKETPLACE_BASE_URL`
//! (default `http://localhost:3000`).

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MARKETPLACE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A username no other test run will have used.
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// HTTP client bound to the API under test.
pub struct TestClient {
    pub client: Client,
    pub base_url: String,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: base_url(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Register a customer, asserting success, and return the profile.
    pub async fn signup(&self, username: &str, password: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/customers/signup"))
            .json(&json!({
                "username": username,
                "password": password,
                "firstname": "Test",
                "lastname": "Customer",
            }))
            .send()
            .await
            .expect("Failed to send signup request");

        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("Failed to parse signup response")
    }

    /// Log in, asserting success, and return the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let resp = self
            .client
            .post(self.url("/customers/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send login request");

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to parse login response");
        body["token"]
            .as_str()
            .expect("login response has no token")
            .to_string()
    }

    /// Register a fresh customer and return `(profile, token)`.
    pub async fn customer_with_token(&self, prefix: &str) -> (Value, String) {
        let username = unique_username(prefix);
        let profile = self.signup(&username, "integration-pw").await;
        let token = self.login(&username, "integration-pw").await;
        (profile, token)
    }

    /// Create a product as the token's customer, asserting success.
    pub async fn create_product(&self, token: &str, name: &str, price: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/products"))
            .bearer_auth(token)
            .json(&json!({ "name": name, "price": price, "description": "integration" }))
            .send()
            .await
            .expect("Failed to send create product request");

        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("Failed to parse product")
    }
}
