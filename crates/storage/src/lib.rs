//! Storage abstraction for registry credentials
//!
//! Defines the two capability traits the auth layer reads credentials
//! through. The host environment owns the actual backends (a durable
//! key-value mapping for usernames, a secret-protected store for
//! passwords); this crate only fixes the seam so the auth provider can be
//! handed `Arc<dyn KeyValueStore>` / `Arc<dyn SecretStore>` at
//! construction instead of reaching for ambient globals.
//!
//! The durable mapping is synchronous; the secret store is asynchronous
//! (secure-storage reads may suspend). `SecretStore` uses
//! `Pin<Box<dyn Future>>` return types for dyn-compatibility.

pub mod memory;

pub use memory::MemoryStore;

use std::future::Future;
use std::pin::Pin;

/// Durable key-value mapping (usernames and other non-secret state).
///
/// `get` returns `None` when the key was never written. Callers decide
/// whether an empty string is acceptable; the store does not.
pub trait KeyValueStore: Send + Sync {
    /// Look up a value by key.
    fn get(&self, key: &str) -> Option<String>;
}

/// Secret-protected mapping (passwords, tokens).
///
/// `get` resolves to `None` only when the key is absent. An empty string
/// is a stored value like any other — anonymous registry accounts store
/// exactly that.
pub trait SecretStore: Send + Sync {
    /// Look up a secret by key.
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
}
