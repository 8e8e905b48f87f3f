//! Portal-specific error types.
//!
//! ## Security Note
//!
//! Error messages must not carry the auth principal, the auth secret or
//! any password presented for validation.

use pf_federation::FederationError;
use thiserror::Error;

/// Portal-specific errors.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Invalid configuration.
    #[error("Portal configuration error: {0}")]
    Configuration(String),

    /// A required configuration key is missing or blank.
    #[error("Portal configuration error: required property '{0}' is missing or empty")]
    MissingProperty(String),

    /// The base URL cannot be used.
    #[error("Invalid Portal base url: {0}")]
    InvalidUrl(String),

    /// The basic auth header could not be built.
    #[error("Cannot build Portal authorization header: {0}")]
    AuthHeader(String),

    /// The request did not complete.
    #[error("Portal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Portal answered with a non-success status.
    #[error("Portal responded with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// The response body is not the expected JSON.
    #[error("Cannot decode Portal response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PortalError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Checks if this error means the configuration is unusable.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::MissingProperty(_) | Self::InvalidUrl(_)
        )
    }

    /// Checks if the request never produced a response.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns the HTTP status of a non-success response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for Portal operations.
pub type PortalResult<T> = Result<T, PortalError>;

impl From<PortalError> for FederationError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Configuration(_)
            | PortalError::MissingProperty(_)
            | PortalError::InvalidUrl(_) => FederationError::Configuration(err.to_string()),
            PortalError::AuthHeader(msg) => FederationError::Configuration(msg),
            PortalError::Transport(e) if e.is_timeout() => {
                FederationError::Timeout(e.to_string())
            }
            PortalError::Transport(e) => FederationError::Connection(e.to_string()),
            PortalError::Status { .. } => FederationError::UserLookup(err.to_string()),
            PortalError::Decode(e) => FederationError::AttributeMapping(e.to_string()),
        }
    }
}
