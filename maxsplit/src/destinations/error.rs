//! Direct-destination service error types.

/// Errors from the direct-destination graph lookup.
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    /// The station has no resolved identifier; the graph cannot be
    /// queried for it.
    #[error("station {0} has no resolved identifier")]
    Unresolved(String),

    /// The directory does not know this identifier. Often means the
    /// foreign name of a border station should be used instead.
    #[error("identifier of {name} not found in the rail directory")]
    UnknownStation { name: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
