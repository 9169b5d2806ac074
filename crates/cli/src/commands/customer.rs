//! Customer management commands.
//!
//! # Usage
//!
//! ```bash
//! mp-cli customer create -u ada -p 'correct horse' --firstname Ada --lastname Lovelace
//! ```
//!
//! Uses the same configuration as the API server (see `marketplace_api::config`),
//! so passwords are hashed with the configured cost.

use thiserror::Error;

use marketplace_api::config::{ApiConfig, ConfigError};
use marketplace_api::db;
use marketplace_api::services::auth::{AuthError, CustomerAuthService, CustomerName};
use marketplace_api::state::{AppState, StateError};

/// Errors that can occur during customer operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid settings: {0}")]
    State(#[from] StateError),

    #[error("Could not create customer: {0}")]
    Auth(#[from] AuthError),
}

/// Create a new customer and return its ID.
pub async fn create(
    username: &str,
    password: &str,
    firstname: String,
    lastname: String,
) -> Result<i32, CustomerError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    let state = AppState::new(config, pool)?;

    let customer = CustomerAuthService::new(state.pool(), state.tokens(), state.passwords())
        .register(username, password, CustomerName { firstname, lastname })
        .await?;

    tracing::info!(
        "Customer created successfully! ID: {}, Username: {}",
        customer.id,
        customer.username
    );

    Ok(customer.id.as_i32())
}
