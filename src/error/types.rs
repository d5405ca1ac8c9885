//! Error type definitions
//!
//! Defines the main error types used throughout the portal client.

use thiserror::Error;

/// Main error type for the portal client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Handshake or session-activation failures. Fatal for the current
    /// operation; the next invocation starts from an empty session.
    #[error("Handshake failed: {reason}")]
    Handshake { reason: String },

    /// Authorization rejected after the bounded retry loop ran out of
    /// attempts and no usable response was received.
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// Stream link resolution errors (all strategies exhausted)
    #[error("Stream resolution failed: {reason}")]
    StreamResolution { reason: String },

    /// Portal rejected a request with a non-success payload
    #[error("Portal request failed with status {status}")]
    Portal { status: u16 },

    /// Unexpected or missing fields in a portal response
    #[error("Malformed portal response: {0}")]
    MalformedResponse(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a handshake error
    pub fn handshake(reason: impl Into<String>) -> Self {
        Self::Handshake {
            reason: reason.into(),
        }
    }

    /// Create an authorization error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a stream resolution error
    pub fn stream_resolution(reason: impl Into<String>) -> Self {
        Self::StreamResolution {
            reason: reason.into(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test config error");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_handshake_error() {
        let err = Error::handshake("portal rejected device identity");
        assert!(matches!(err, Error::Handshake { .. }));
        assert!(err.to_string().contains("Handshake failed"));
    }

    #[test]
    fn test_portal_error_carries_status() {
        let err = Error::Portal { status: 401 };
        assert_eq!(err.to_string(), "Portal request failed with status 401");
    }

    #[test]
    fn test_stream_resolution_error() {
        let err = Error::stream_resolution("no strategy produced a link");
        assert!(matches!(err, Error::StreamResolution { .. }));
        assert!(err.to_string().contains("Stream resolution failed"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
