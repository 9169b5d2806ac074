//! Customer authentication service.
//!
//! Username/password registration and login. Passwords are hashed with
//! Argon2id; a successful login returns a signed, time-limited token. No
//! session state is stored server-side.

mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{CredentialHasher, HasherError};
pub use token::{Claims, IssuedToken, TokenError, TokenIssuer};

use sqlx::PgPool;
use tracing::instrument;

use marketplace_core::{CustomerId, Username};

use crate::db::{CustomerRepository, CustomerStore, RepositoryError};
use crate::models::{Customer, NewCustomer};

/// Name fields supplied at registration.
#[derive(Debug, Clone, Default)]
pub struct CustomerName {
    pub firstname: String,
    pub lastname: String,
}

/// Customer authentication service.
///
/// Generic over the store so the flows can run against the in-memory store
/// in tests; production code uses [`CustomerAuthService::new`].
pub struct CustomerAuthService<'a, S = CustomerRepository<'a>> {
    customers: S,
    tokens: &'a TokenIssuer,
    passwords: &'a CredentialHasher,
}

impl<'a> CustomerAuthService<'a> {
    /// Create a new authentication service backed by `PostgreSQL`.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        tokens: &'a TokenIssuer,
        passwords: &'a CredentialHasher,
    ) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            tokens,
            passwords,
        }
    }
}

impl<'a, S: CustomerStore> CustomerAuthService<'a, S> {
    /// Create a service over an arbitrary customer store.
    pub const fn with_store(
        customers: S,
        tokens: &'a TokenIssuer,
        passwords: &'a CredentialHasher,
    ) -> Self {
        Self {
            customers,
            tokens,
            passwords,
        }
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidPassword` for
    /// bad input and `AuthError::AlreadyExists` if the username is taken.
    #[instrument(skip(self, password, name))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        name: CustomerName,
    ) -> Result<Customer, AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;

        if self
            .customers
            .find_customer_by_username(&username)
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.passwords.hash(password).await?;

        let customer = self
            .customers
            .create_customer(&NewCustomer {
                username,
                password_hash,
                firstname: name.firstname,
                lastname: name.lastname,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                RepositoryError::Conflict(_) => AuthError::AlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(customer_id = %customer.id, "Customer registered");
        Ok(customer)
    }

    /// Check credentials and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if no customer has that username and
    /// `AuthError::InvalidCredentials` if the password does not match.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::NotFound)?;

        let customer = self
            .customers
            .find_customer_by_username(&username)
            .await?
            .ok_or(AuthError::NotFound)?;

        if let Err(e) = self.passwords.verify(password, &customer.password_hash).await {
            tracing::warn!(customer_id = %customer.id, "Password verification failed");
            return Err(e);
        }

        let issued = self.tokens.issue(customer.username.as_str())?;
        Ok(issued)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if the customer doesn't exist.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, AuthError> {
        self.customers
            .find_customer_by_id(id)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Get a customer by username, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the input is not a valid
    /// username, or `AuthError::Repository` on store failure.
    pub async fn get_customer_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Customer>, AuthError> {
        let username = Username::parse(username)?;
        Ok(self.customers.find_customer_by_username(&username).await?)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::InvalidPassword(
            "password cannot be empty".to_owned(),
        ));
    }
    Ok(())
}
