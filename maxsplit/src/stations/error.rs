//! Station resolution error types.

/// Errors that can occur while resolving a station name.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Neither the normalization table nor the external directory knows
    /// this name. Fatal to the whole search.
    #[error("station not found: {0}")]
    NotFound(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Directory returned an error status
    #[error("directory error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
