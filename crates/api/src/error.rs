//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Error responses are JSON: `{ "status": "error", "errorMessage": "..." }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::{AuthError, TokenError};
use crate::services::products::ProductError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Product operation failed.
    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidUsername(_) | AuthError::InvalidPassword(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::AlreadyExists => StatusCode::CONFLICT,
                AuthError::NotFound => StatusCode::NOT_FOUND,
                AuthError::InvalidCredentials
                | AuthError::Token(TokenError::Invalid(_) | TokenError::Expired) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::PasswordHash
                | AuthError::Token(TokenError::Encode(_) | TokenError::ExpiryOutOfRange)
                | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Product(err) => match err {
                ProductError::Validation(_) | ProductError::InvalidPrice(_) => {
                    StatusCode::BAD_REQUEST
                }
                ProductError::NotFound(_)
                | ProductError::NameNotFound(_)
                | ProductError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
                ProductError::DuplicateName { .. } => StatusCode::CONFLICT,
                ProductError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show the client.
    fn client_message(&self) -> String {
        // Don't expose internal error details to clients
        if self.status().is_server_error() {
            return "Internal server error".to_string();
        }

        match self {
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Auth(AuthError::Token(TokenError::Expired)) => "Token expired".to_string(),
            Self::Auth(AuthError::Token(_)) => "Invalid token".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Product(err) => err.to_string(),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = json!({
            "status": "error",
            "errorMessage": self.client_message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated customer.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}
