//! Federation provider configuration.
//!
//! [`FederationConfig`] is the component configuration the host stores for
//! each registered provider. Provider-specific settings live in the string
//! map and are described to the admin surface with [`ConfigProperty`].

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FederationError, FederationResult};

/// Default connect timeout for outbound calls.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default overall timeout for one outbound call.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Base configuration for all federation providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationConfig {
    /// Unique identifier for this provider configuration.
    ///
    /// Shadow records carry it as their federation link.
    pub id: Uuid,

    /// Realm this provider belongs to.
    pub realm_id: Uuid,

    /// Provider type (e.g., "portal").
    pub provider_type: String,

    /// Display name.
    pub name: String,

    /// Provider-specific configuration.
    pub config: HashMap<String, String>,

    /// Connection timeout.
    #[serde(with = "duration_secs")]
    pub connection_timeout: Duration,

    /// Read timeout.
    #[serde(with = "duration_secs")]
    pub read_timeout: Duration,
}

impl FederationConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> FederationConfigBuilder {
        FederationConfigBuilder::new()
    }

    /// Gets a config value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a config value, treating blank values as absent.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Checks that every key is present and non-blank.
    ///
    /// ## Errors
    ///
    /// Returns a configuration error naming the first missing key.
    pub fn require(&self, keys: &[&str]) -> FederationResult<()> {
        match keys.iter().find(|key| self.get_non_empty(key).is_none()) {
            Some(key) => Err(FederationError::config(format!(
                "required property '{key}' is missing or empty"
            ))),
            None => Ok(()),
        }
    }
}

/// Builder for FederationConfig.
#[derive(Debug, Default)]
pub struct FederationConfigBuilder {
    id: Option<Uuid>,
    realm_id: Option<Uuid>,
    provider_type: Option<String>,
    name: Option<String>,
    config: HashMap<String, String>,
    connection_timeout: Duration,
    read_timeout: Duration,
}

impl FederationConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            ..Default::default()
        }
    }

    /// Sets the ID.
    #[must_use]
    pub const fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the realm ID.
    #[must_use]
    pub const fn realm_id(mut self, realm_id: Uuid) -> Self {
        self.realm_id = Some(realm_id);
        self
    }

    /// Sets the provider type.
    #[must_use]
    pub fn provider_type(mut self, provider_type: impl Into<String>) -> Self {
        self.provider_type = Some(provider_type.into());
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a config value.
    #[must_use]
    pub fn config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Builds the configuration.
    ///
    /// A missing ID is generated.
    ///
    /// ## Errors
    ///
    /// Returns a configuration error if the realm, provider type or name
    /// is not set.
    pub fn build(self) -> FederationResult<FederationConfig> {
        Ok(FederationConfig {
            id: self.id.unwrap_or_else(Uuid::now_v7),
            realm_id: self
                .realm_id
                .ok_or_else(|| FederationError::config("realm_id is required"))?,
            provider_type: self
                .provider_type
                .ok_or_else(|| FederationError::config("provider_type is required"))?,
            name: self
                .name
                .ok_or_else(|| FederationError::config("name is required"))?,
            config: self.config,
            connection_timeout: self.connection_timeout,
            read_timeout: self.read_timeout,
        })
    }
}

// ============================================================================
// Configuration Metadata
// ============================================================================

/// Input type of a configuration property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigPropertyType {
    /// Free text.
    String,
}

/// Describes one provider configuration key to the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigProperty {
    /// Key in [`FederationConfig::config`].
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Help text.
    pub help_text: &'static str,
    /// Input type.
    pub property_type: ConfigPropertyType,
    /// Whether the value must be masked when displayed.
    pub secret: bool,
    /// Whether the value must be present.
    pub required: bool,
}

impl ConfigProperty {
    /// Creates a required, non-secret string property.
    #[must_use]
    pub const fn string(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            help_text: "",
            property_type: ConfigPropertyType::String,
            secret: false,
            required: true,
        }
    }

    /// Sets the help text.
    #[must_use]
    pub const fn help(mut self, help_text: &'static str) -> Self {
        self.help_text = help_text;
        self
    }

    /// Marks the property as secret.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Serde support for Duration as whole seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
