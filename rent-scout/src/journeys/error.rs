//! Journey service error types.

/// Errors from the journey service client.
///
/// Rate limiting, server and gateway failures are transient and safe to
/// retry (all calls are GETs); `PlaceNotFound` is terminal for the query
/// that raised it. "No journey found" is not an error at all — the client
/// returns an empty candidate list for it.
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Too many requests; carries the service's retry-after hint in seconds.
    #[error("rate limited by journey service (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<u64> },

    /// The service could not resolve a place name.
    #[error("place not recognised by journey service: {message}")]
    PlaceNotFound { message: String },

    /// The service reported an internal error.
    #[error("journey service internal error: {message}")]
    Server { message: String },

    /// The service's gateway failed.
    #[error("journey service gateway error: {message}")]
    Gateway { message: String },

    /// Any other non-success status.
    #[error("journey API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to decode a response body.
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Client-side configuration problem (bad base URL).
    #[error("invalid journey client configuration: {0}")]
    Config(String),
}
