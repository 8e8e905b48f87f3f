//! Federation error types.
//!
//! Remote directory failures are absorbed by providers and never reach the
//! host as errors. What does surface here is misconfiguration, which should
//! abort provider setup, and failures of the host's own stores.

use thiserror::Error;

/// Errors that can occur during federation operations.
#[derive(Debug, Error)]
pub enum FederationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection error to external system.
    #[error("Connection error: {0}")]
    Connection(String),

    /// User lookup error.
    #[error("User lookup error: {0}")]
    UserLookup(String),

    /// Attribute mapping error.
    #[error("Attribute mapping error: {0}")]
    AttributeMapping(String),

    /// Timeout error.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Storage error when persisting federated users.
    #[error("Storage error: {0}")]
    Storage(#[from] pf_storage::StorageError),
}

impl FederationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an attribute mapping error.
    #[must_use]
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::AttributeMapping(msg.into())
    }

    /// Checks if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Checks if this is a connection error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }

    /// Checks if this error came from the host's local store.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;
