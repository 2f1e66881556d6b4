//! Registry authentication negotiation
//!
//! Client-side authentication for Docker Registry HTTP API v2 hosts: the
//! provider assumes plain Basic credentials and upgrades to the registry's
//! bearer-token scheme only when challenged. This crate is a standalone
//! library with no registry endpoint knowledge of its own — the consumer
//! drives the protocol.
//!
//! Negotiation flow:
//! 1. Consumer calls `BasicOAuthProvider::get_session()` → credentials are
//!    read fresh from the injected stores and encoded as a Basic token
//! 2. The registry rejects the request with 401 and a
//!    `WWW-Authenticate: Bearer …` challenge
//! 3. Consumer hands the challenge header to `fallback()` → the provider
//!    switches to OAuth mode for the rest of its life
//! 4. The next `get_session()` performs a password-grant exchange against
//!    the challenge's realm and yields a Bearer session
//! 5. Consumer retries the registry request with the bearer token

pub mod challenge;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod session;

pub use challenge::Challenge;
pub use credentials::{Credentials, get_credentials};
pub use error::{Error, Result};
pub use provider::{AuthMode, BasicOAuthProvider};
pub use session::{Session, SessionAccount, TokenType};
