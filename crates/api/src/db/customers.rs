//! Customer repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use marketplace_core::{CustomerId, Username};

use super::{CustomerStore, RepositoryError, map_write_error};
use crate::models::{Customer, NewCustomer};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    username: String,
    password_hash: String,
    firstname: String,
    lastname: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            username,
            password_hash: row.password_hash,
            firstname: row.firstname,
            lastname: row.lastname,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CustomerStore for CustomerRepository<'_> {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO marketplace.customer (username, password_hash, firstname, lastname)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, firstname, lastname, created_at, updated_at
            ",
        )
        .bind(&customer.username)
        .bind(&customer.password_hash)
        .bind(&customer.firstname)
        .bind(&customer.lastname)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn find_customer_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, username, password_hash, firstname, lastname, created_at, updated_at
            FROM marketplace.customer
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, username, password_hash, firstname, lastname, created_at, updated_at
            FROM marketplace.customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }
}
