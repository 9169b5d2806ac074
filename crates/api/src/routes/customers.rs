//! Customer signup, login, and profile routes.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketplace_core::CustomerId;

use super::{json_body, path_param};
use crate::error::Result;
use crate::middleware::RequireCustomer;
use crate::models::CustomerProfile;
use crate::services::auth::{AuthError, CustomerAuthService, CustomerName};
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub username: String,
}

fn auth_service(state: &AppState) -> CustomerAuthService<'_> {
    CustomerAuthService::new(state.pool(), state.tokens(), state.passwords())
}

/// Register a new customer.
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerProfile>)> {
    let request = json_body(payload)?;

    let customer = auth_service(&state)
        .register(
            &request.username,
            &request.password,
            CustomerName {
                firstname: request.firstname,
                lastname: request.lastname,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CustomerProfile::from(&customer))))
}

/// Exchange username and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let request = json_body(payload)?;

    let issued = auth_service(&state)
        .authenticate(&request.username, &request.password)
        .await?;

    tracing::info!(username = %request.username.trim(), "Customer logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        username: request.username.trim().to_string(),
    }))
}

/// Profile of the authenticated customer.
pub async fn me(
    State(state): State<AppState>,
    RequireCustomer(claims): RequireCustomer,
) -> Result<Json<CustomerProfile>> {
    let customer = auth_service(&state)
        .get_customer_by_username(&claims.sub)
        .await?
        .ok_or(AuthError::NotFound)?;

    Ok(Json(CustomerProfile::from(&customer)))
}

/// Profile of any customer by ID.
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(_claims): RequireCustomer,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<CustomerProfile>> {
    let id = CustomerId::new(path_param(id)?);

    let customer = auth_service(&state).get_customer(id).await?;

    Ok(Json(CustomerProfile::from(&customer)))
}
