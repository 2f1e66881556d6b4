//! Error types for the HTTP layer

/// Errors from wrapped HTTP calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered 401. Carries the request URL so upstream
    /// layers can report which endpoint demanded authentication.
    #[error("unauthorized (HTTP 401): {url}")]
    Unauthorized { url: String },

    #[error("response body is not valid JSON: {0}")]
    BodyParse(String),

    /// Network/DNS/TLS failures, passed through unmodified.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Result alias for HTTP operations.
pub type Result<T> = std::result::Result<T, Error>;
