//! In-memory store — backs tests and embedders without a host store.
//!
//! Implements both capability traits over plain maps. Writes go through
//! `put_value` / `put_secret`; removal exists so credential rotation and
//! deletion can be exercised against the same instance the auth provider
//! holds.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;

use crate::{KeyValueStore, SecretStore};

/// In-memory implementation of both store traits.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    secrets: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a durable value.
    pub fn put_value(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .expect("store lock poisoned")
            .insert(key.into(), value.into());
    }

    /// Store a secret.
    pub fn put_secret(&self, key: impl Into<String>, value: impl Into<String>) {
        self.secrets
            .write()
            .expect("store lock poisoned")
            .insert(key.into(), value.into());
    }

    /// Remove a durable value.
    pub fn remove_value(&self, key: &str) {
        self.values
            .write()
            .expect("store lock poisoned")
            .remove(key);
    }

    /// Remove a secret.
    pub fn remove_secret(&self, key: &str) {
        self.secrets
            .write()
            .expect("store lock poisoned")
            .remove(key);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .expect("store lock poisoned")
            .get(key)
            .cloned()
    }
}

impl SecretStore for MemoryStore {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        let secret = self
            .secrets
            .read()
            .expect("store lock poisoned")
            .get(key)
            .cloned();
        Box::pin(async move { secret })
    }
}
