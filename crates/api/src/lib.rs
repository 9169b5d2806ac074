//! Marketplace API library.
//!
//! JSON HTTP backend for a small marketplace: customers register and log in
//! with username and password, receive a bearer token, and list products
//! that other customers can browse.
//!
//! This crate provides the server as a library so the binary, the CLI, and
//! tests can share it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
