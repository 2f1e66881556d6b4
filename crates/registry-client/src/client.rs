//! Catalog and tag listing with caller-driven bearer negotiation
//!
//! The fallback is an explicit two-phase protocol, never an automatic
//! retry loop: one attempt, and if the registry rejects Basic before any
//! fallback has happened, one negotiation followed by one retry. A 401
//! after the provider is already in bearer mode is final.

use std::sync::Arc;
use std::time::Duration;

use registry_auth::BasicOAuthProvider;
use registry_http::{HttpClient, HttpResponse, RequestSpec};
use serde::Deserialize;
use storage::{KeyValueStore, SecretStore};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};

/// Scope covering catalog listing.
const CATALOG_SCOPE: &str = "registry:catalog:*";

#[derive(Debug, Deserialize)]
struct CatalogPage {
    repositories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagList {
    tags: Vec<String>,
}

/// Client for one registry root.
pub struct RegistryV2Client {
    root: String,
    http: HttpClient,
    auth: Arc<BasicOAuthProvider>,
}

impl RegistryV2Client {
    /// Wire a client to an existing provider and HTTP client. A trailing
    /// slash on the root is dropped so URL joins stay predictable.
    pub fn new(root_url: impl Into<String>, http: HttpClient, auth: Arc<BasicOAuthProvider>) -> Self {
        let root = root_url.into().trim_end_matches('/').to_string();
        Self { root, http, auth }
    }

    /// Build a client (and its provider) from configuration and injected
    /// store handles.
    pub fn from_config(
        config: &RegistryConfig,
        kv: Arc<dyn KeyValueStore>,
        secrets: Arc<dyn SecretStore>,
    ) -> common::Result<Self> {
        config.validate()?;

        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| common::Error::Config(format!("failed to build HTTP client: {e}")))?;
        let http = HttpClient::with_client(inner);

        let auth = Arc::new(BasicOAuthProvider::new(
            config.credential_key.clone(),
            kv,
            secrets,
            http.clone(),
        ));

        info!(root_url = config.root_url, "registry client configured");
        Ok(Self::new(config.root_url.clone(), http, auth))
    }

    /// The provider this client authenticates through.
    pub fn auth(&self) -> &BasicOAuthProvider {
        &self.auth
    }

    /// `GET /v2/_catalog` — list repository names.
    pub async fn list_repositories(&self) -> Result<Vec<String>> {
        let url = format!("{}/v2/_catalog", self.root);
        let scopes = [CATALOG_SCOPE.to_string()];
        let response = self.get_with_fallback(&url, &scopes).await?;
        let page: CatalogPage = response.json()?;
        Ok(page.repositories)
    }

    /// `GET /v2/<name>/tags/list` — list tags of one repository.
    pub async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/{}/tags/list", self.root, repository);
        let scopes = [format!("repository:{repository}:pull")];
        let response = self.get_with_fallback(&url, &scopes).await?;
        let tags: TagList = response.json()?;
        Ok(tags.tags)
    }

    /// One attempt, plus the single negotiation retry when the registry
    /// rejects Basic and no fallback has happened yet.
    async fn get_with_fallback(&self, url: &str, scopes: &[String]) -> Result<HttpResponse> {
        match self.attempt(url, scopes).await {
            Err(Error::Http(registry_http::Error::Unauthorized { .. }))
                if !self.auth.did_fallback() =>
            {
                debug!(url, "basic authentication rejected, negotiating bearer token");
                let header = self.challenge_header(url).await?;
                self.auth.fallback(&header).await?;
                self.attempt(url, scopes).await
            }
            other => other,
        }
    }

    async fn attempt(&self, url: &str, scopes: &[String]) -> Result<HttpResponse> {
        let session = self.auth.get_session(scopes).await?;
        let spec = RequestSpec::get().header("Authorization", session.authorization_header());
        let response = self.http.request(url, spec).await?;

        // Only 401 is raised by the wrapper; everything else is checked
        // here.
        if !response.succeeded() {
            return Err(Error::Failed {
                status: response.status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    /// Re-issue the rejected request without raising so the challenge
    /// can be read off the 401 response.
    async fn challenge_header(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .request_with(url, RequestSpec::get(), false)
            .await?;
        response
            .header("www-authenticate")
            .map(str::to_owned)
            .ok_or_else(|| Error::MissingChallenge {
                url: url.to_string(),
            })
    }
}
