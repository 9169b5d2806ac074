//! Database operations for the marketplace `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `marketplace.customer` - Customer accounts (unique `username`)
//! - `marketplace.product` - Products, each owned by one customer
//!   (unique `(customer_id, name)`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p marketplace-cli -- migrate
//! ```
//!
//! # Store traits
//!
//! Services talk to [`CustomerStore`] and [`ProductStore`] rather than to the
//! repositories directly, so business rules can be exercised against the
//! in-memory store in tests.

pub mod customers;
#[cfg(test)]
pub mod memory;
pub mod products;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use marketplace_core::{CustomerId, ProductId, Username};

pub use customers::CustomerRepository;
pub use products::ProductRepository;

use crate::models::{Customer, NewCustomer, Product, ProductFields};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key violation (e.g., product for a missing customer).
    #[error("foreign key violation: {0}")]
    ForeignKey(String),
}

/// Translate constraint violations on writes into typed repository errors.
///
/// Everything else is passed through as `RepositoryError::Database` with the
/// original sqlx error preserved.
pub(crate) fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(constraint);
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::ForeignKey(constraint);
        }
    }
    RepositoryError::Database(e)
}

/// Persistence operations over customer records.
pub trait CustomerStore: Send + Sync {
    /// Insert a new customer.
    ///
    /// Fails with `RepositoryError::Conflict` if the username is taken.
    fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> impl Future<Output = Result<Customer, RepositoryError>> + Send;

    /// Look up a customer by username.
    fn find_customer_by_username(
        &self,
        username: &Username,
    ) -> impl Future<Output = Result<Option<Customer>, RepositoryError>> + Send;

    /// Look up a customer by ID.
    fn find_customer_by_id(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<Customer>, RepositoryError>> + Send;
}

/// Persistence operations over product records.
pub trait ProductStore: Send + Sync {
    /// Insert a product owned by `customer_id`.
    ///
    /// Fails with `RepositoryError::Conflict` on a duplicate `(customer, name)`
    /// pair and `RepositoryError::ForeignKey` if the customer does not exist.
    fn create_product(
        &self,
        customer_id: CustomerId,
        fields: &ProductFields,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// Look up a product by ID.
    fn find_product_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// All products whose name matches exactly.
    fn find_products_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Every product.
    fn find_all_products(&self) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Products owned by `customer_id` when `mine` is true, otherwise every
    /// product owned by someone else.
    fn find_products_by_ownership(
        &self,
        customer_id: CustomerId,
        mine: bool,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Overwrite name, price, and description. Ownership is untouched.
    ///
    /// Fails with `RepositoryError::NotFound` if no row matched.
    fn update_product(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// Delete a product and return the removed row.
    ///
    /// Fails with `RepositoryError::NotFound` if no row matched.
    fn delete_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
