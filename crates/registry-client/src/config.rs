//! Registry configuration loading
//!
//! One TOML file describes one registry connection: where the registry
//! lives and which credential namespace to read. Secrets never appear in
//! the file — they stay in the secret store, keyed by `credential_key`.

use std::path::Path;

use common::{Error, Result};
use serde::Deserialize;

/// Connection settings for a single registry.
#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    /// Registry root, e.g. `https://registry.example`.
    pub root_url: String,
    /// Credential namespace: username and secret live under
    /// `"{credential_key}.username"` / `"{credential_key}.secret"`.
    pub credential_key: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    60
}

impl RegistryConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RegistryConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values. Split out so embedders constructing the
    /// struct directly get the same checks.
    pub fn validate(&self) -> Result<()> {
        if !self.root_url.starts_with("http://") && !self.root_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "root_url must start with http:// or https://, got: {}",
                self.root_url
            )));
        }

        if self.credential_key.is_empty() {
            return Err(Error::Config("credential_key must not be empty".into()));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
