//! Session types produced by the auth provider
//!
//! A session is the unit the consumer carries for one logical operation
//! (a catalog listing, a tag listing). It is never persisted.

use std::fmt;

/// Session id for Basic-mode sessions.
pub const BASIC_SESSION_ID: &str = "basic";

/// Session id for OAuth-mode sessions.
pub const OAUTH_SESSION_ID: &str = "oauth";

/// How the access token is presented to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Basic,
    Bearer,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Basic => "Basic",
            TokenType::Bearer => "Bearer",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The account a session was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAccount {
    pub id: String,
    pub label: String,
}

/// An authentication session for one logical registry operation.
#[derive(Debug, Clone)]
pub struct Session {
    /// `"basic"` or `"oauth"`, matching the provider mode that issued it.
    pub id: String,
    pub token_type: TokenType,
    pub account: SessionAccount,
    pub access_token: String,
    pub scopes: Vec<String>,
}

impl Session {
    /// Value for the `Authorization` header of a registry request.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
