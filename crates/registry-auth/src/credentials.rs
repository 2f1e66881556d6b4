//! Credential lookup
//!
//! Reads the username from the durable store and the secret from the
//! secret store, keyed `"{storage_key}.username"` /
//! `"{storage_key}.secret"`. Lookups happen fresh on every session
//! request — nothing is cached — so a rotated secret is observed on the
//! very next call.
//!
//! The two halves fail differently on purpose: a username must be present
//! and non-empty, while a secret only has to be present. The empty string
//! is a valid secret (anonymous token accounts store exactly that).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::Secret;
use storage::{KeyValueStore, SecretStore};
use tracing::debug;

use crate::error::{Error, Result};

/// A username/secret pair read from the stores.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: Secret<String>,
}

impl Credentials {
    /// `base64("username:secret")` — the Basic token form, used both as a
    /// session access token and in the `Authorization` header of the
    /// OAuth exchange.
    pub fn basic_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.secret.expose()))
    }
}

/// Read credentials for `storage_key` from the injected stores.
pub async fn get_credentials(
    kv: &dyn KeyValueStore,
    secrets: &dyn SecretStore,
    storage_key: &str,
) -> Result<Credentials> {
    let username_key = format!("{storage_key}.username");
    let username = match kv.get(&username_key) {
        Some(username) if !username.is_empty() => username,
        _ => return Err(Error::CredentialsNotFound(username_key)),
    };

    let secret_key = format!("{storage_key}.secret");
    let secret = secrets
        .get(&secret_key)
        .await
        .ok_or_else(|| Error::CredentialsNotFound(secret_key))?;

    debug!(storage_key, username, "loaded registry credentials");

    Ok(Credentials {
        username,
        secret: secret.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    fn store_with(username: Option<&str>, secret: Option<&str>) -> MemoryStore {
        let store = MemoryStore::new();
        if let Some(username) = username {
            store.put_value("registry.example.username", username);
        }
        if let Some(secret) = secret {
            store.put_secret("registry.example.secret", secret);
        }
        store
    }

    #[tokio::test]
    async fn reads_both_halves() {
        let store = store_with(Some("alice"), Some("s3cr3t"));
        let creds = get_credentials(&store, &store, "registry.example")
            .await
            .unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.secret.expose(), "s3cr3t");
    }

    #[tokio::test]
    async fn basic_token_is_base64_of_colon_joined_pair() {
        let store = store_with(Some("alice"), Some("s3cr3t"));
        let creds = get_credentials(&store, &store, "registry.example")
            .await
            .unwrap();
        assert_eq!(creds.basic_token(), "YWxpY2U6czNjcjN0");
    }

    #[tokio::test]
    async fn absent_username_fails_with_the_username_key() {
        let store = store_with(None, Some("s3cr3t"));
        let err = get_credentials(&store, &store, "registry.example")
            .await
            .unwrap_err();
        match err {
            Error::CredentialsNotFound(key) => assert_eq!(key, "registry.example.username"),
            other => panic!("expected CredentialsNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_username_is_rejected() {
        let store = store_with(Some(""), Some("s3cr3t"));
        assert!(
            get_credentials(&store, &store, "registry.example")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn absent_secret_fails_with_the_secret_key() {
        let store = store_with(Some("alice"), None);
        let err = get_credentials(&store, &store, "registry.example")
            .await
            .unwrap_err();
        match err {
            Error::CredentialsNotFound(key) => assert_eq!(key, "registry.example.secret"),
            other => panic!("expected CredentialsNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_secret_is_valid() {
        let store = store_with(Some("alice"), Some(""));
        let creds = get_credentials(&store, &store, "registry.example")
            .await
            .unwrap();
        assert!(creds.secret.is_empty());
        assert_eq!(creds.basic_token(), "YWxpY2U6");
    }

    #[tokio::test]
    async fn keys_are_namespaced_by_storage_key() {
        let store = MemoryStore::new();
        store.put_value("other.username", "bob");
        store.put_secret("other.secret", "x");
        // The registry.example namespace is untouched.
        assert!(
            get_credentials(&store, &store, "registry.example")
                .await
                .is_err()
        );
        assert!(get_credentials(&store, &store, "other").await.is_ok());
    }
}
