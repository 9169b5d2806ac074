//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use marketplace_core::{CustomerId, Price, ProductId};

use super::{ProductStore, RepositoryError, map_write_error};
use crate::models::{Product, ProductFields};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    description: String,
    customer_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            price,
            description: row.description,
            customer_id: CustomerId::new(row.customer_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn collect_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

const PRODUCT_COLUMNS: &str = "id, name, price, description, customer_id, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl ProductStore for ProductRepository<'_> {
    async fn create_product(
        &self,
        customer_id: CustomerId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError> {
        let query = format!(
            "INSERT INTO marketplace.product (name, price, description, customer_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(&fields.name)
            .bind(fields.price)
            .bind(&fields.description)
            .bind(customer_id)
            .fetch_one(self.pool)
            .await
            .map_err(map_write_error)?;

        row.try_into()
    }

    async fn find_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM marketplace.product WHERE id = $1");

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    async fn find_products_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM marketplace.product WHERE name = $1 ORDER BY id"
        );

        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(name)
            .fetch_all(self.pool)
            .await?;

        collect_products(rows)
    }

    async fn find_all_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM marketplace.product ORDER BY id");

        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .fetch_all(self.pool)
            .await?;

        collect_products(rows)
    }

    async fn find_products_by_ownership(
        &self,
        customer_id: CustomerId,
        mine: bool,
    ) -> Result<Vec<Product>, RepositoryError> {
        let predicate = if mine {
            "customer_id = $1"
        } else {
            "customer_id <> $1"
        };
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM marketplace.product WHERE {predicate} ORDER BY id"
        );

        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(customer_id)
            .fetch_all(self.pool)
            .await?;

        collect_products(rows)
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError> {
        let query = format!(
            "UPDATE marketplace.product \
             SET name = $2, price = $3, description = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .bind(&fields.name)
            .bind(fields.price)
            .bind(&fields.description)
            .fetch_optional(self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn delete_product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let query =
            format!("DELETE FROM marketplace.product WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
