//! Basic/OAuth authentication provider — the negotiation state machine
//!
//! A provider starts in Basic mode and answers session requests locally
//! by encoding the stored credentials. When the registry rejects Basic
//! with a bearer challenge, the consumer hands the `WWW-Authenticate`
//! value to `fallback`, which switches the provider to OAuth mode for the
//! rest of its life; session requests then perform a password-grant
//! exchange against the challenge's realm.
//!
//! The provider never talks to the registry itself and never retries.
//! Observing the 401 and retrying afterwards is the consumer's explicit
//! two-step protocol, which keeps the transition observable and
//! testable. `fallback` is the only state-mutating entry point.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use registry_http::{HttpClient, RequestSpec};
use serde::Deserialize;
use storage::{KeyValueStore, SecretStore};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::challenge::Challenge;
use crate::credentials::{self, Credentials};
use crate::error::{Error, Result};
use crate::session::{BASIC_SESSION_ID, OAUTH_SESSION_ID, Session, SessionAccount, TokenType};

/// Protocol state. Basic until the first successful `fallback`, OAuth
/// afterwards; there is no transition back. The OAuth variant carries
/// the whole challenge context, so an endpoint can never exist without
/// its service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    Basic,
    OAuth {
        endpoint: String,
        service: String,
        default_scopes: Vec<String>,
    },
}

/// Password-grant response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Basic-first authentication provider with transparent bearer upgrade.
///
/// The mode lives behind an `RwLock` and is swapped whole: `get_session`
/// clones a snapshot under the read lock, `fallback` replaces the variant
/// under the write lock. Concurrent callers see the old mode or the new
/// one, never a torn mix.
pub struct BasicOAuthProvider {
    storage_key: String,
    kv: Arc<dyn KeyValueStore>,
    secrets: Arc<dyn SecretStore>,
    http: HttpClient,
    mode: RwLock<AuthMode>,
    did_fallback: AtomicBool,
}

impl BasicOAuthProvider {
    /// Create a provider in Basic mode for the given credential
    /// namespace, with injected store handles.
    pub fn new(
        storage_key: impl Into<String>,
        kv: Arc<dyn KeyValueStore>,
        secrets: Arc<dyn SecretStore>,
        http: HttpClient,
    ) -> Self {
        Self {
            storage_key: storage_key.into(),
            kv,
            secrets,
            http,
            mode: RwLock::new(AuthMode::Basic),
            did_fallback: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current mode.
    pub async fn mode(&self) -> AuthMode {
        self.mode.read().await.clone()
    }

    /// Produce a session for the requested scopes.
    ///
    /// Credentials are re-read from the stores on every call; the whole
    /// call fails if that fails. Basic mode needs no network. OAuth mode
    /// performs the password-grant exchange; HTTP-layer failures
    /// propagate unchanged.
    pub async fn get_session(&self, scopes: &[String]) -> Result<Session> {
        let creds = credentials::get_credentials(
            self.kv.as_ref(),
            self.secrets.as_ref(),
            &self.storage_key,
        )
        .await?;

        let mode = self.mode.read().await.clone();
        match mode {
            AuthMode::Basic => Ok(basic_session(&creds, scopes)),
            AuthMode::OAuth {
                endpoint,
                service,
                default_scopes,
            } => {
                self.oauth_session(&creds, &endpoint, &service, &default_scopes, scopes)
                    .await
            }
        }
    }

    /// Switch to OAuth mode using the registry's challenge header.
    ///
    /// Parse failures surface with the raw header text. On success the
    /// mode is swapped atomically; a later call simply overwrites the
    /// endpoint/service/scopes with the latest challenge.
    pub async fn fallback(&self, header: &str) -> Result<()> {
        let challenge = Challenge::parse(header)?;

        info!(
            storage_key = self.storage_key,
            endpoint = challenge.realm,
            service = challenge.service,
            "switching to bearer token authentication"
        );

        let mut mode = self.mode.write().await;
        *mode = AuthMode::OAuth {
            endpoint: challenge.realm,
            service: challenge.service,
            default_scopes: challenge.scope,
        };
        drop(mode);

        self.did_fallback.store(true, Ordering::Release);
        Ok(())
    }

    /// Whether `fallback` has ever succeeded. Monotonic.
    pub fn did_fallback(&self) -> bool {
        self.did_fallback.load(Ordering::Acquire)
    }

    /// Session revocation — no such protocol exists for registry
    /// sessions; always fails.
    pub fn remove_session(&self, session_id: &str) -> Result<()> {
        Err(Error::NotImplemented(format!(
            "session revocation ({session_id})"
        )))
    }

    async fn oauth_session(
        &self,
        creds: &Credentials,
        endpoint: &str,
        service: &str,
        default_scopes: &[String],
        scopes: &[String],
    ) -> Result<Session> {
        // Challenge scopes first, then the caller's, duplicates allowed.
        let mut union: Vec<String> = default_scopes.to_vec();
        union.extend(scopes.iter().cloned());
        let scope = union.join(" ");

        debug!(endpoint, service, scope, "requesting bearer token");

        let spec = RequestSpec::get()
            .header("Authorization", format!("Basic {}", creds.basic_token()))
            .header("grant_type", "password")
            .header("service", service)
            .header("scope", &scope);

        let response = self.http.request(endpoint, spec).await?;
        let token: TokenResponse = response.json()?;

        Ok(Session {
            id: OAUTH_SESSION_ID.to_string(),
            token_type: TokenType::Bearer,
            account: account_for(creds),
            access_token: token.token,
            scopes: union,
        })
    }
}

fn basic_session(creds: &Credentials, scopes: &[String]) -> Session {
    Session {
        id: BASIC_SESSION_ID.to_string(),
        token_type: TokenType::Basic,
        account: account_for(creds),
        access_token: creds.basic_token(),
        scopes: scopes.to_vec(),
    }
}

fn account_for(creds: &Credentials) -> SessionAccount {
    SessionAccount {
        id: creds.username.clone(),
        label: creds.username.clone(),
    }
}
