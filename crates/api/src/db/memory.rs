//! In-memory store used by service tests.
//!
//! Mirrors the constraints the migrations put on the real tables: unique
//! usernames, unique `(customer_id, name)` per product, and the product to
//! customer foreign key.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use marketplace_core::{CustomerId, ProductId, Username};

use super::{CustomerStore, ProductStore, RepositoryError};
use crate::models::{Customer, NewCustomer, Product, ProductFields};

#[derive(Debug, Default)]
struct Inner {
    customers: Vec<Customer>,
    products: Vec<Product>,
    next_customer_id: i32,
    next_product_id: i32,
}

/// Shared, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Number of stored products.
    pub fn product_count(&self) -> usize {
        self.lock().products.len()
    }
}

impl Inner {
    fn name_taken(&self, owner: CustomerId, name: &str, except: Option<ProductId>) -> bool {
        self.products
            .iter()
            .any(|p| p.customer_id == owner && p.name == name && Some(p.id) != except)
    }
}

impl CustomerStore for MemoryStore {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let mut inner = self.lock();
        if inner
            .customers
            .iter()
            .any(|c| c.username == customer.username)
        {
            return Err(RepositoryError::Conflict("customer_username_key".to_owned()));
        }

        inner.next_customer_id += 1;
        let now = Utc::now();
        let created = Customer {
            id: CustomerId::new(inner.next_customer_id),
            username: customer.username.clone(),
            password_hash: customer.password_hash.clone(),
            firstname: customer.firstname.clone(),
            lastname: customer.lastname.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.customers.push(created.clone());
        Ok(created)
    }

    async fn find_customer_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .lock()
            .customers
            .iter()
            .find(|c| &c.username == username)
            .cloned())
    }

    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.lock().customers.iter().find(|c| c.id == id).cloned())
    }
}

impl ProductStore for MemoryStore {
    async fn create_product(
        &self,
        customer_id: CustomerId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError> {
        let mut inner = self.lock();
        if !inner.customers.iter().any(|c| c.id == customer_id) {
            return Err(RepositoryError::ForeignKey(
                "product_customer_id_fkey".to_owned(),
            ));
        }
        if inner.name_taken(customer_id, &fields.name, None) {
            return Err(RepositoryError::Conflict(
                "product_customer_name_key".to_owned(),
            ));
        }

        inner.next_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(inner.next_product_id),
            name: fields.name.clone(),
            price: fields.price,
            description: fields.description.clone(),
            customer_id,
            created_at: now,
            updated_at: now,
        };
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn find_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_products_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect())
    }

    async fn find_all_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.lock().products.clone())
    }

    async fn find_products_by_ownership(
        &self,
        customer_id: CustomerId,
        mine: bool,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| (p.customer_id == customer_id) == mine)
            .cloned()
            .collect())
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError> {
        let mut inner = self.lock();
        let owner = inner
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.customer_id)
            .ok_or(RepositoryError::NotFound)?;
        if inner.name_taken(owner, &fields.name, Some(id)) {
            return Err(RepositoryError::Conflict(
                "product_customer_name_key".to_owned(),
            ));
        }

        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.name.clone_from(&fields.name);
        product.price = fields.price;
        product.description.clone_from(&fields.description);
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let mut inner = self.lock();
        let index = inner
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(inner.products.remove(index))
    }
}
