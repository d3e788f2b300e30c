//! Error types for the record management interface
//!
//! Every provider maps its failures into [`Error`] at its own boundary, so
//! callers can classify outcomes without knowing which backend produced them.

use thiserror::Error;

/// Result type alias for record operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type shared by all record providers
#[derive(Error, Debug)]
pub enum Error {
    /// Credential loading or token acquisition failed, or the API rejected
    /// the credentials (HTTP 401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The zone lookup returned no matching zone
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// The provider reported that the resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The provider answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider message, or the raw body when it could not be parsed
        message: String,
    },

    /// The request did not produce a usable response (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider does not offer this capability
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O errors (reading configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "zone not found" error
    pub fn zone_not_found(zone: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a "not implemented" error
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented(operation.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the provider reported that the target already exists
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Whether zone resolution found nothing
    pub fn is_zone_not_found(&self) -> bool {
        matches!(self, Self::ZoneNotFound(_))
    }

    /// Whether this is a remote failure that is neither a conflict nor an
    /// authentication problem
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Http(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_classified_structurally() {
        assert!(Error::conflict("www.example.com. (A) already exists").is_conflict());
        assert!(!Error::api(409, "looks like a conflict").is_conflict());
        assert!(!Error::http("connection reset").is_conflict());
    }

    #[test]
    fn transport_kinds() {
        assert!(Error::api(403, "forbidden").is_transport());
        assert!(Error::http("timed out").is_transport());
        assert!(!Error::auth("bad key").is_transport());
        assert!(!Error::zone_not_found("example.com.").is_transport());
    }

    #[test]
    fn display_includes_status() {
        let err = Error::api(404, "The 'parameters.name' resource named 'x' does not exist.");
        assert_eq!(
            err.to_string(),
            "API error (404): The 'parameters.name' resource named 'x' does not exist."
        );
    }

    #[test]
    fn anyhow_conversion_keeps_message() {
        let err: Error = anyhow::anyhow!("boom").into();
        assert!(matches!(err, Error::Other(ref m) if m == "boom"));
    }
}
