//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketplace_core::{CustomerId, Username};

/// A marketplace customer (domain type).
///
/// Holds the password hash, so it is never serialized directly. Use
/// [`CustomerProfile`] for anything that leaves the process.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Unique login name.
    pub username: Username,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// When the customer registered.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for persisting a new customer. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub username: Username,
    pub password_hash: String,
    pub firstname: String,
    pub lastname: String,
}

/// Public view of a customer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub username: Username,
    pub firstname: String,
    pub lastname: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerProfile {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            username: customer.username.clone(),
            firstname: customer.firstname.clone(),
            lastname: customer.lastname.clone(),
            created_at: customer.created_at,
        }
    }
}
