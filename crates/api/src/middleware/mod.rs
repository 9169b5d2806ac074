//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Bearer authentication is an extractor ([`RequireCustomer`]) rather than a
//! layer, so public and protected routes can share a path.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, RequireCustomer};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
