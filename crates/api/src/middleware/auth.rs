//! Bearer token authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::{Claims, TokenError};
use crate::state::AppState;

/// Extractor that requires a valid `Authorization: Bearer <token>` header.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireCustomer(claims): RequireCustomer,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireCustomer(pub Claims);

/// Why a request failed bearer authentication.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization` header, or not a bearer credential.
    MissingToken,
    /// Signature, issuer, or structure check failed.
    InvalidToken,
    /// The token has expired.
    ExpiredToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "Missing bearer token",
            Self::InvalidToken => "Invalid token",
            Self::ExpiredToken => "Token expired",
        };
        AppError::Unauthorized(message.to_string()).into_response()
    }
}

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let claims = state.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            match e {
                TokenError::Expired => AuthRejection::ExpiredToken,
                TokenError::Invalid(_) | TokenError::Encode(_) | TokenError::ExpiryOutOfRange => {
                    AuthRejection::InvalidToken
                }
            }
        })?;

        set_sentry_user(&claims.sub);
        Ok(Self(claims))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
