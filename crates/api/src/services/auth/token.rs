//! JWT issuance and verification.
//!
//! Tokens are HS256-signed and carry `{ sub, iat, exp, iss }`, where `sub` is
//! the customer's username. Nothing is persisted; a token is valid until it
//! expires.

use core::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TokenConfig;

/// Errors from token issuance or verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Signature, issuer, or structure is wrong.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// The token is past its `exp`.
    #[error("token expired")]
    Expired,

    /// Issue time plus lifetime falls outside the representable date range.
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated customer.
    pub sub: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

/// A freshly signed token and when it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies customer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: TimeDelta,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer from token configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: config.issuer.clone(),
            lifetime: TimeDelta::hours(i64::from(config.expires_in_hours)),
        }
    }

    /// Issue a token for `username`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::ExpiryOutOfRange` if the expiry cannot be
    /// represented and `TokenError::Encode` if signing fails.
    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: username.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token's signature, expiry, and issuer.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token and
    /// `TokenError::Invalid` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(secret: &str, issuer: &str) -> TokenConfig {
        TokenConfig {
            secret: SecretString::from(secret.to_owned()),
            expires_in_hours: 8,
            issuer: issuer.to_owned(),
        }
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&config("k3Jd9!xQ2vLp7#Rt5wZm8@Yb4nHc6^Fs", "Ecommerce"))
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = issuer();
        let issued = issuer.issue("alice").unwrap();
        let claims = issuer.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "Ecommerce");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn test_expired_token() {
        let issuer = issuer();
        let issued = issuer
            .issue_at("alice", Utc::now() - TimeDelta::hours(9))
            .unwrap();

        assert!(matches!(
            issuer.verify(&issued.token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = issuer().issue("alice").unwrap();
        let other = TokenIssuer::new(&config("Zq8#mW2!pL5vR9^tY3@kN7&hB4cX6dFj", "Ecommerce"));

        assert!(matches!(
            other.verify(&issued.token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let secret = "k3Jd9!xQ2vLp7#Rt5wZm8@Yb4nHc6^Fs";
        let issued = TokenIssuer::new(&config(secret, "Elsewhere"))
            .issue("alice")
            .unwrap();

        assert!(matches!(
            issuer().verify(&issued.token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            issuer().verify("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let mut long = config("k3Jd9!xQ2vLp7#Rt5wZm8@Yb4nHc6^Fs", "Ecommerce");
        long.expires_in_hours = u32::MAX;

        assert!(matches!(
            TokenIssuer::new(&long).issue("alice"),
            Err(TokenError::ExpiryOutOfRange)
        ));
        assert!(matches!(
            issuer().issue_at("alice", DateTime::<Utc>::MAX_UTC),
            Err(TokenError::ExpiryOutOfRange)
        ));
    }
}
