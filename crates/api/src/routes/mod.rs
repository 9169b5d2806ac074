//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness check
//! GET    /health/ready                        - Readiness check (database)
//!
//! # Customers
//! POST   /customers/signup                    - Register
//! POST   /customers/login                     - Exchange credentials for a token
//! GET    /customers/me                        - Own profile (bearer)
//! GET    /customers/{id}                      - Profile by ID (bearer)
//!
//! # Products
//! GET    /products                            - All products (?name= for exact match)
//! POST   /products                            - Create (bearer)
//! PUT    /products                            - Update, ID in body (bearer)
//! GET    /products/{id}                       - Product by ID
//! DELETE /products/{id}                       - Delete, returns the product (bearer)
//! GET    /products/{customer_id}/{only_mine}  - Own or everyone else's products
//! ```

pub mod customers;
pub mod products;

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Request, Response, StatusCode},
    middleware,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(customers::signup))
        .route("/login", post(customers::login))
        .route("/me", get(customers::me))
        .route("/{id}", get(customers::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::index)
                .post(products::create)
                .put(products::update),
        )
        .route("/{id}", get(products::show).delete(products::delete))
        .route("/{customer_id}/{only_mine}", get(products::visible))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
}

/// Build the application router with tracing and request IDs.
///
/// Sentry layers are added by the binary, outside this stack.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Unwrap a JSON body, turning extractor rejections into the API error shape.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Unwrap a path parameter, turning extractor rejections into the API error shape.
fn path_param<T>(param: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    param
        .map(|Path(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Unwrap a query string, turning extractor rejections into the API error shape.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::state::test_state;

    async fn send(request: Request<Body>) -> Response<Body> {
        app(test_state()).oneshot(request).await.unwrap()
    }

    async fn json(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(Request::get("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer() {
        for request in [
            Request::get("/customers/me").body(Body::empty()).unwrap(),
            Request::get("/customers/1").body(Body::empty()).unwrap(),
            post_json("/products", r#"{"name":"Lamp","price":"1.00"}"#),
            Request::put("/products")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"id":1,"name":"Lamp","price":"1.00"}"#))
                .unwrap(),
            Request::delete("/products/1").body(Body::empty()).unwrap(),
        ] {
            let uri = request.uri().clone();
            let response = send(request).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");

            let body = json(response).await;
            assert_eq!(body["status"], "error");
        }
    }

    #[tokio::test]
    async fn test_invalid_bearer_token() {
        let response = send(
            Request::get("/customers/me")
                .header(AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["errorMessage"], "Invalid token");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let response = send(post_json("/customers/signup", "{not json")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["status"], "error");
    }

    #[tokio::test]
    async fn test_signup_validation_is_400() {
        let response = send(post_json(
            "/customers/signup",
            r#"{"username":"two words","password":"pw"}"#,
        ))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(post_json(
            "/customers/signup",
            r#"{"username":"ada","password":""}"#,
        ))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_blank_username_is_404() {
        let response = send(post_json(
            "/customers/login",
            r#"{"username":"   ","password":"pw"}"#,
        ))
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_path_params_are_400() {
        let response = send(Request::get("/products/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            Request::get("/products/abc/true")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_query_string_is_json_400() {
        let response = send(
            Request::get("/products?name=Lamp&name=Chair")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["errorMessage"].is_string());
    }

    #[tokio::test]
    async fn test_create_product_rejects_bad_body_before_lookup() {
        let state = test_state();
        let token = state.tokens().issue("ada").unwrap().token;

        let response = app(state)
            .oneshot(
                Request::post("/products")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Lamp"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
