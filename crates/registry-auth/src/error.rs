//! Error types for authentication negotiation

/// Errors from credential lookup, challenge parsing, and session requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No usable entry under the given storage key: the username was
    /// absent or empty, or the secret was absent. Carries the key that
    /// failed so the user can tell which half of the pair is missing.
    #[error("credentials not found for storage key: {0}")]
    CredentialsNotFound(String),

    /// The registry's challenge did not match the bearer grammar.
    /// Carries the raw header text.
    #[error("could not parse WWW-Authenticate header: {0}")]
    ChallengeParse(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// HTTP-layer failures from the token exchange (transport errors and
    /// 401), passed through unchanged.
    #[error(transparent)]
    Http(#[from] registry_http::Error),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
