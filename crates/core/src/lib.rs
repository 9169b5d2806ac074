//! Marketplace Core - Shared types library.
//!
//! This crate provides the domain types used across all marketplace components:
//! - `api` - JSON HTTP backend (customers, products, authentication)
//! - `cli` - Command-line tools for migrations and customer management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is opt-in through the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
