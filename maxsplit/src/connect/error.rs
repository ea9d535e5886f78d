//! Booking API client error types.

/// Errors from the booking API HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited or blocked by the anti-bot layer.
    ///
    /// Remediation (cookie refresh) is out of band; the client never
    /// retries on its own.
    #[error("rate limited by the booking API")]
    RateLimited,

    /// Session cookie rejected or expired
    #[error("unauthorized: refresh the booking-site session cookie")]
    Unauthorized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConnectError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = ConnectError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));

        assert!(ConnectError::RateLimited.to_string().contains("rate limited"));
    }
}
