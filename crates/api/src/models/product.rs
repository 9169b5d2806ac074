//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use marketplace_core::{CustomerId, Price, ProductId};

/// A product listed by a customer (domain type).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Name, unique within the owning customer's products.
    pub name: String,
    /// Non-negative price.
    pub price: Price,
    /// Free-form description.
    pub description: String,
    /// Owning customer. Never changes after creation.
    pub customer_id: CustomerId,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied product fields before validation.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

/// Validated mutable product fields, as written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub price: Price,
    pub description: String,
}
