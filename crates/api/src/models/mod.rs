//! Domain models for the marketplace.
//!
//! These types represent validated domain objects separate from database row types.

pub mod customer;
pub mod product;

pub use customer::{Customer, CustomerProfile, NewCustomer};
pub use product::{Product, ProductDraft, ProductFields};
