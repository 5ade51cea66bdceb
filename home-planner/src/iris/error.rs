//! Timetable API error types.

/// Errors from the timetable HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum IrisError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials rejected
    #[error("unauthorized: check HOME_PLANNER_DB_CLIENT_ID and HOME_PLANNER_DB_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by timetable API")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}
