//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Customer registration and login, password hashing, token issuance
//! - `products` - Product CRUD and the ownership visibility query

pub mod auth;
pub mod products;
