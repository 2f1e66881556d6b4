//! HTTP layer for registry calls
//!
//! Thin wrapper over reqwest that every registry-facing request goes
//! through. It does two things:
//!
//! 1. Normalizes responses into [`HttpResponse`]: numeric status, status
//!    text, a flattened header map, and a lazy `json()` accessor over the
//!    buffered body.
//! 2. Promotes exactly one status to a typed error: HTTP 401 becomes
//!    [`Error::Unauthorized`] (unless the caller opts out). 401 is the
//!    only status that changes control flow — it triggers the
//!    re-authentication fallback upstream — so it alone is
//!    distinguishable. Every other non-2xx comes back as a normal
//!    response for the caller to inspect via `succeeded`.

pub mod error;
pub mod request;

pub use error::{Error, Result};
pub use request::{HttpClient, HttpResponse, RequestSpec};
pub use reqwest::Method;
