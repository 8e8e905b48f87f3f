//! Storage-qualified user ids.
//!
//! The host hands federation providers ids of the form
//! `f:<provider id>:<external id>`. A bare id without the `f:` prefix is
//! treated as an external id with no provider qualifier.

use std::fmt;

const FEDERATED_PREFIX: &str = "f:";

/// A user id split into its provider and external parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageId {
    provider_id: Option<String>,
    external_id: String,
}

impl StorageId {
    /// Parses a host-supplied id.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        let Some(rest) = id.strip_prefix(FEDERATED_PREFIX) else {
            return Self {
                provider_id: None,
                external_id: id.to_string(),
            };
        };

        match rest.split_once(':') {
            Some((provider_id, external_id)) => Self {
                provider_id: Some(provider_id.to_string()),
                external_id: external_id.to_string(),
            },
            // "f:" with no second separator carries no external part
            None => Self {
                provider_id: Some(rest.to_string()),
                external_id: String::new(),
            },
        }
    }

    /// Builds a qualified id.
    #[must_use]
    pub fn federated(provider_id: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            provider_id: Some(provider_id.into()),
            external_id: external_id.into(),
        }
    }

    /// Returns the provider part, if qualified.
    #[must_use]
    pub fn provider_id(&self) -> Option<&str> {
        self.provider_id.as_deref()
    }

    /// Returns the external part.
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Returns true if the id is qualified by the given provider, or not
    /// qualified at all.
    #[must_use]
    pub fn belongs_to(&self, provider_id: &str) -> bool {
        self.provider_id.as_deref().is_none_or(|p| p == provider_id)
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider_id {
            Some(provider_id) => write!(f, "{FEDERATED_PREFIX}{provider_id}:{}", self.external_id),
            None => f.write_str(&self.external_id),
        }
    }
}
