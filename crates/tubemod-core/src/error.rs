//! Error types for tubemod

use crate::types::Lane;
use thiserror::Error;

/// Main error type for tubemod
#[derive(Debug, Error)]
pub enum TubemodError {
    /// Transport-level failure (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from a remote collaborator.
    ///
    /// Displays the server-provided message verbatim, or the
    /// operation-specific fallback when the body carried none.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// HTTP 401, or a session the store no longer recognizes
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// Rejected before any request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store answered 2xx but reported the command as unsuccessful
    #[error("{0}")]
    Unsuccessful(String),

    /// A classify or command lane already has a request in flight
    #[error("{0} is already running")]
    AlreadyRunning(Lane),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TubemodError>,
    },
}

impl TubemodError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TubemodError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) means the operator must log in again
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            TubemodError::Unauthenticated(_) => true,
            TubemodError::WithContext { source, .. } => source.is_unauthenticated(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TubemodError::Http { status, .. } => Some(*status),
            TubemodError::Unauthenticated(_) => Some(401),
            TubemodError::WithContext { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TubemodError {
    fn from(err: toml::de::Error) -> Self {
        TubemodError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for TubemodError {
    fn from(err: toml::ser::Error) -> Self {
        TubemodError::Toml(err.to_string())
    }
}

/// Result type alias for tubemod
pub type Result<T> = std::result::Result<T, TubemodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_displays_server_message() {
        let err = TubemodError::Http {
            status: 500,
            message: "db unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "db unavailable");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_error_with_context() {
        let err = TubemodError::Validation("no comments selected".to_string());
        let err = err.with_context("Failed to moderate comments");
        assert!(err.to_string().contains("Failed to moderate comments"));
    }

    #[test]
    fn test_unauthenticated_survives_context() {
        let err = TubemodError::Unauthenticated("Session expired".to_string())
            .with_context("Failed to load comments");
        assert!(err.is_unauthenticated());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_already_running_display() {
        let err = TubemodError::AlreadyRunning(Lane::Classify);
        assert_eq!(err.to_string(), "classification is already running");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TubemodError = io_err.into();
        assert!(matches!(err, TubemodError::Io(_)));
    }
}
