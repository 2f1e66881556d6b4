//! Registry V2 consumer
//!
//! Catalog and tag listing against a Docker Registry HTTP API v2 host,
//! authenticated through `registry-auth`. This crate owns the caller side
//! of the negotiation protocol: it attempts a request with the current
//! session, and when the HTTP layer reports 401 before any fallback has
//! happened, it captures the registry's challenge, switches the provider
//! to bearer mode, and retries exactly once.
//!
//! Request lifecycle:
//! 1. `get_session` → request with `Authorization: Basic …`
//! 2. Registry answers 401 → the wrapper raises `Unauthorized`
//! 3. Re-issue the request without raising, read `WWW-Authenticate`
//! 4. `fallback` switches the provider, `get_session` now fetches a
//!    bearer token
//! 5. Retry the request with `Authorization: Bearer …`

pub mod client;
pub mod config;
pub mod error;

pub use client::RegistryV2Client;
pub use config::RegistryConfig;
pub use error::{Error, Result};
