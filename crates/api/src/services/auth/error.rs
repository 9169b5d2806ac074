//! Authentication error types.

use thiserror::Error;

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during customer authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] marketplace_core::UsernameError),

    /// Password missing or unusable.
    #[error("invalid password: {0}")]
    InvalidPassword(String),

    /// A customer with that username already exists.
    #[error("customer already exists")]
    AlreadyExists,

    /// No customer matched.
    #[error("customer not found")]
    NotFound,

    /// Password did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token could not be issued or verified.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Whether this error was caused by bad caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUsername(_) | Self::InvalidPassword(_))
    }
}
