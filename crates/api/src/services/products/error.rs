//! Product service error types.

use thiserror::Error;

use marketplace_core::{CustomerId, PriceError, ProductId};

use crate::db::RepositoryError;

/// Errors that can occur during product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Input failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Negative price.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// No product with this ID.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// No product with this name.
    #[error("no product named '{0}'")]
    NameNotFound(String),

    /// The owning customer already has a product with this name.
    #[error("a product named '{name}' already exists for this customer")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// The owning customer does not exist.
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ProductError {
    /// Whether this error was caused by bad caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidPrice(_))
    }

    /// Whether this error means the target does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::NameNotFound(_) | Self::CustomerNotFound(_)
        )
    }
}
