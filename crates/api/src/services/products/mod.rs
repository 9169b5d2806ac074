//! Product service.
//!
//! Thin CRUD over the product store plus the visibility query: a customer's
//! own products versus everyone else's.

mod error;

pub use error::ProductError;

use sqlx::PgPool;
use tracing::instrument;

use marketplace_core::{CustomerId, Price, ProductId};

use crate::db::{ProductRepository, ProductStore, RepositoryError};
use crate::models::{Product, ProductDraft, ProductFields};

/// Product service.
pub struct ProductService<S> {
    products: S,
}

impl<'a> ProductService<ProductRepository<'a>> {
    /// Create a new product service backed by `PostgreSQL`.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }
}

impl<S: ProductStore> ProductService<S> {
    /// Create a service over an arbitrary product store.
    pub const fn with_store(products: S) -> Self {
        Self { products }
    }

    /// Create a product owned by `customer_id`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Validation` / `ProductError::InvalidPrice` for
    /// bad input, `ProductError::CustomerNotFound` if the owner does not
    /// exist, and `ProductError::DuplicateName` if the owner already has a
    /// product with that name.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(
        &self,
        customer_id: CustomerId,
        draft: ProductDraft,
    ) -> Result<Product, ProductError> {
        let fields = validate(draft)?;

        let product = self
            .products
            .create_product(customer_id, &fields)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ProductError::DuplicateName {
                    name: fields.name.clone(),
                },
                RepositoryError::ForeignKey(_) => ProductError::CustomerNotFound(customer_id),
                other => ProductError::Repository(other),
            })?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product doesn't exist.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Product, ProductError> {
        self.products
            .find_product_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Get every product with exactly this name.
    ///
    /// Names are only unique per customer, so several products can match.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NameNotFound` if nothing matches.
    pub async fn get_by_name(&self, name: &str) -> Result<Vec<Product>, ProductError> {
        let products = self.products.find_products_by_name(name).await?;
        if products.is_empty() {
            return Err(ProductError::NameNotFound(name.to_owned()));
        }
        Ok(products)
    }

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` on store failure.
    pub async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.products.find_all_products().await?)
    }

    /// Products owned by `customer_id` when `only_mine` is set, otherwise all
    /// products owned by other customers.
    ///
    /// An unknown customer is not an error: `only_mine` yields nothing and the
    /// complement yields everything.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` on store failure.
    #[instrument(skip(self))]
    pub async fn list_visible(
        &self,
        customer_id: CustomerId,
        only_mine: bool,
    ) -> Result<Vec<Product>, ProductError> {
        Ok(self
            .products
            .find_products_by_ownership(customer_id, only_mine)
            .await?)
    }

    /// Replace a product's name, price, and description.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product doesn't exist and
    /// `ProductError::DuplicateName` if the new name collides with another
    /// product of the same owner.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, ProductError> {
        let fields = validate(draft)?;

        self.products
            .update_product(id, &fields)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ProductError::NotFound(id),
                RepositoryError::Conflict(_) => ProductError::DuplicateName {
                    name: fields.name.clone(),
                },
                other => ProductError::Repository(other),
            })
    }

    /// Delete a product, returning what was removed.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product doesn't exist, including
    /// when it disappears between the lookup and the delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<Product, ProductError> {
        self.get_by_id(id).await?;

        let deleted = self.products.delete_product(id).await.map_err(|e| match e {
            RepositoryError::NotFound => {
                tracing::warn!(product_id = %id, "Product vanished before delete");
                ProductError::NotFound(id)
            }
            other => ProductError::Repository(other),
        })?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(deleted)
    }
}

/// Validate caller input into storable fields.
fn validate(draft: ProductDraft) -> Result<ProductFields, ProductError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ProductError::Validation(
            "product name cannot be empty".to_owned(),
        ));
    }

    Ok(ProductFields {
        name: name.to_owned(),
        price: Price::new(draft.price)?,
        description: draft.description,
    })
}
