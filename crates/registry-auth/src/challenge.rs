//! WWW-Authenticate bearer challenge parsing
//!
//! Registries that use the Docker token authentication scheme answer
//! unauthenticated requests with
//! `WWW-Authenticate: Bearer realm="…", service="…", scope="…"`.
//! Parsing is pure: one anchored pattern, values taken verbatim between
//! the quotes (no URL-decoding), scope split on single spaces with order
//! preserved.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// Scheme keyword is case-insensitive; the comma before each field may or
// may not be followed by whitespace. Field order is fixed.
static BEARER_CHALLENGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?i:bearer)\s+realm="([^"]*)",\s*service="([^"]*)",\s*scope="([^"]*)"\s*$"#,
    )
    .expect("bearer challenge pattern is valid")
});

/// A parsed bearer challenge. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Token endpoint URL, verbatim from the header.
    pub realm: String,
    /// Service identifier the token must be issued for.
    pub service: String,
    /// Scopes granted by default, in header order.
    pub scope: Vec<String>,
}

impl Challenge {
    /// Parse one header value. Fails with [`Error::ChallengeParse`]
    /// (carrying the raw text) on anything that does not match the
    /// bearer grammar.
    pub fn parse(header: &str) -> Result<Self> {
        let captures = BEARER_CHALLENGE
            .captures(header)
            .ok_or_else(|| Error::ChallengeParse(header.to_string()))?;

        Ok(Self {
            realm: captures[1].to_string(),
            service: captures[2].to_string(),
            scope: captures[3].split(' ').map(String::from).collect(),
        })
    }
}
