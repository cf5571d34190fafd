//! Error types for CloudDeck

use thiserror::Error;

/// Result type alias using CloudDeck Error
pub type Result<T> = std::result::Result<T, Error>;

/// CloudDeck error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend rejected the request. `detail` carries the backend's
    /// human-readable message verbatim.
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("invalid console URL format")]
    MalformedUrl(String),

    #[error("invalid console URL format")]
    MissingHost,

    #[error("invalid console URL format")]
    UnsupportedScheme { scheme: String },

    #[error("Console launch blocked: {0}")]
    LaunchBlocked(String),

    #[error("Console session is closed")]
    SessionClosed,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error came out of signaling-URL parsing. All three parse
    /// failures surface to users as one generic message, never the raw
    /// parse detail.
    pub fn is_url_parse_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedUrl(_) | Error::MissingHost | Error::UnsupportedScheme { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_parse_errors_share_generic_message() {
        let errors = [
            Error::MalformedUrl("not a url".to_string()),
            Error::MissingHost,
            Error::UnsupportedScheme {
                scheme: "ftp".to_string(),
            },
        ];
        for e in &errors {
            assert!(e.is_url_parse_error());
            assert_eq!(e.to_string(), "invalid console URL format");
        }
    }

    #[test]
    fn test_api_error_carries_backend_detail() {
        let e = Error::Api {
            status: 404,
            detail: "Server not found: not found".to_string(),
        };
        assert!(e.to_string().contains("Server not found"));
    }
}
