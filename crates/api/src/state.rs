//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::auth::{CredentialHasher, HasherError, TokenIssuer};

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid password hashing configuration")]
    PasswordHasher(#[from] HasherError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    tokens: TokenIssuer,
    passwords: CredentialHasher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the password hashing parameters are rejected.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, StateError> {
        let tokens = TokenIssuer::new(&config.token);
        let passwords = CredentialHasher::new(config.password_hash_cost)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                passwords,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Get a reference to the password hasher.
    #[must_use]
    pub fn passwords(&self) -> &CredentialHasher {
        &self.inner.passwords
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
fn test_config() -> ApiConfig {
    use secrecy::SecretString;

    use crate::config::TokenConfig;

    ApiConfig {
        database_url: SecretString::from("postgres://localhost/marketplace_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        token: TokenConfig {
            secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"),
            expires_in_hours: 8,
            issuer: "Ecommerce".to_string(),
        },
        password_hash_cost: 1,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
fn lazy_pool() -> PgPool {
    sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/marketplace_test")
        .unwrap()
}

/// State backed by a lazy pool that never connects unless a handler touches
/// the database.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_state() -> AppState {
    AppState::new(test_config(), lazy_pool()).unwrap()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_zero_hash_cost() {
        let mut config = test_config();
        config.password_hash_cost = 0;

        let err = AppState::new(config, lazy_pool()).err().unwrap();
        assert!(matches!(
            err,
            StateError::PasswordHasher(HasherError::InvalidParams { time_cost: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_state_exposes_configured_hasher() {
        let state = test_state();
        assert_eq!(state.passwords().time_cost(), 1);
        assert_eq!(state.config().token.issuer, "Ecommerce");
    }
}
