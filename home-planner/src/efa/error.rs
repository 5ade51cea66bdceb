//! EFA client error types.

/// Errors from the EFA HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum EfaError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the API
    #[error("rate limited by EFA API")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}
