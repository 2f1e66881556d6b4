//! Error types for registry operations

/// Errors from catalog/tag listing and the negotiation protocol.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Auth-layer failures (credentials, challenge parsing, token
    /// exchange), passed through unchanged.
    #[error(transparent)]
    Auth(#[from] registry_auth::Error),

    /// HTTP-layer failures from registry endpoints, passed through
    /// unchanged. `Unauthorized` here is what triggers the fallback.
    #[error(transparent)]
    Http(#[from] registry_http::Error),

    /// The registry answered 401 without a WWW-Authenticate header, so
    /// there is nothing to negotiate with.
    #[error("401 response carried no WWW-Authenticate challenge: {url}")]
    MissingChallenge { url: String },

    /// Non-2xx registry response outside the negotiation path.
    #[error("registry request failed with status {status}: {url}")]
    Failed { status: u16, url: String },
}

/// Result alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;
