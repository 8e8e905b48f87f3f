//! Portal provider factory.

use pf_federation::config::{ConfigProperty, FederationConfig};
use pf_federation::error::FederationResult;
use pf_federation::provider::{FederationSession, UserStorageProviderFactory};

use crate::cache::IdentityCache;
use crate::config::{self, PortalConfig, REQUIRED_KEYS};
use crate::provider::PortalUserFederationProvider;

/// Identifier the host registers the factory under.
pub const PROVIDER_ID: &str = "portal-user-federation-provider";

/// Creates [`PortalUserFederationProvider`] instances.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortalProviderFactory;

impl PortalProviderFactory {
    /// Creates the factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl UserStorageProviderFactory for PortalProviderFactory {
    type Provider = PortalUserFederationProvider;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn help_text(&self) -> &'static str {
        "Imports users from a Portal on first lookup and migrates their password on first login"
    }

    fn config_properties(&self) -> Vec<ConfigProperty> {
        config::config_properties()
    }

    fn validate_configuration(&self, config: &FederationConfig) -> FederationResult<()> {
        config.require(&REQUIRED_KEYS)?;
        PortalConfig::from_federation_config(config)?;
        Ok(())
    }

    fn create(
        &self,
        config: &FederationConfig,
        session: FederationSession,
    ) -> FederationResult<Self::Provider> {
        self.validate_configuration(config)?;
        let provider = PortalUserFederationProvider::new(config, session, IdentityCache::new())?;

        tracing::info!(
            provider_id = %config.id,
            realm_id = %config.realm_id,
            name = %config.name,
            "Created Portal federation provider"
        );
        Ok(provider)
    }
}
