//! Listing service error types.

/// Errors from the listing service client.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status.
    #[error("listing API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to decode a response body.
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
