//! Portal federation provider.
//!
//! Users are imported on demand: a lookup that misses the local store asks
//! the Portal and materializes the profile as a local identity linked to
//! this provider. The first successful password check migrates the
//! identity to a local credential and removes the link, after which the
//! Portal is no longer consulted for it.
//!
//! ## Security Requirements
//!
//! - Passwords are never logged
//! - A failed or unconfirmed validation never mutates local state

use std::sync::Arc;

use pf_federation::config::FederationConfig;
use pf_federation::error::{FederationError, FederationResult};
use pf_federation::provider::{
    CredentialInputValidator, FederationSession, UserLookupProvider, UserStorageProvider,
};
use pf_model::{CredentialInput, CredentialType, LocalIdentity};
use uuid::Uuid;

use crate::cache::IdentityCache;
use crate::client::{PortalClient, RemoteDirectory};
use crate::config::PortalConfig;
use crate::materializer::ShadowRecordMaterializer;

/// Provider type identifier.
pub const PROVIDER_TYPE: &str = "portal";

/// Key of one on-demand lookup.
#[derive(Debug, Clone, Copy)]
enum LookupKey<'a> {
    Username(&'a str),
    Email(&'a str),
}

impl LookupKey<'_> {
    const fn value(&self) -> &str {
        match self {
            Self::Username(v) | Self::Email(v) => *v,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            Self::Email(_) => "email",
        }
    }
}

/// On-demand federation provider backed by a Portal directory.
///
/// One instance serves one unit of work; its [`IdentityCache`] lives and
/// dies with it.
pub struct PortalUserFederationProvider {
    /// Federation configuration.
    config: FederationConfig,

    /// Portal connection settings.
    portal: Arc<PortalConfig>,

    /// Remote user directory.
    directory: Arc<dyn RemoteDirectory>,

    /// Host stores for this unit of work.
    session: FederationSession,

    /// Shadow record creation.
    materializer: ShadowRecordMaterializer,

    /// Lookup cache for this unit of work.
    cache: IdentityCache,
}

impl PortalUserFederationProvider {
    /// Creates a provider talking to the configured Portal.
    ///
    /// ## Errors
    ///
    /// Returns a configuration error if the Portal keys are invalid.
    pub fn new(
        config: &FederationConfig,
        session: FederationSession,
        cache: IdentityCache,
    ) -> FederationResult<Self> {
        let portal = Arc::new(PortalConfig::from_federation_config(config)?);
        let client = PortalClient::new(Arc::clone(&portal))?;
        Ok(Self::assemble(config, portal, Arc::new(client), session, cache))
    }

    /// Creates a provider over an arbitrary remote directory.
    ///
    /// ## Errors
    ///
    /// Returns a configuration error if the Portal keys are invalid.
    pub fn with_directory(
        config: &FederationConfig,
        directory: Arc<dyn RemoteDirectory>,
        session: FederationSession,
        cache: IdentityCache,
    ) -> FederationResult<Self> {
        let portal = Arc::new(PortalConfig::from_federation_config(config)?);
        Ok(Self::assemble(config, portal, directory, session, cache))
    }

    fn assemble(
        config: &FederationConfig,
        portal: Arc<PortalConfig>,
        directory: Arc<dyn RemoteDirectory>,
        session: FederationSession,
        cache: IdentityCache,
    ) -> Self {
        let materializer = ShadowRecordMaterializer::new(config.id, Arc::clone(session.users()));
        Self {
            config: config.clone(),
            portal,
            directory,
            session,
            materializer,
            cache,
        }
    }

    /// Returns the provider ID shadow records are linked to.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.config.id
    }

    /// Returns the Portal configuration.
    #[must_use]
    pub fn portal_config(&self) -> &PortalConfig {
        &self.portal
    }

    /// Returns the unit-of-work cache.
    #[must_use]
    pub const fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    async fn resolve(
        &self,
        realm_id: Uuid,
        key: LookupKey<'_>,
    ) -> FederationResult<Option<LocalIdentity>> {
        if key.value().trim().is_empty() {
            tracing::debug!(kind = key.kind(), "Ignoring lookup with empty key");
            return Ok(None);
        }

        if let Some(cached) = self.cache.get(key.value()) {
            tracing::debug!(kind = key.kind(), key = key.value(), "Identity cache hit");
            return Ok(Some(cached));
        }

        let users = self.session.users();
        let local = match key {
            LookupKey::Username(username) => users.get_by_username(realm_id, username).await?,
            LookupKey::Email(email) => users.get_by_email(realm_id, email).await?,
        };
        if let Some(local) = local {
            tracing::debug!(kind = key.kind(), key = key.value(), "Found local identity");
            self.cache.put(key.value(), local.clone());
            return Ok(Some(local));
        }

        let profile = match key {
            LookupKey::Username(username) => self.directory.fetch_by_username(username).await,
            LookupKey::Email(email) => self.directory.fetch_by_email(email).await,
        };
        let Some(profile) = profile else {
            tracing::info!(kind = key.kind(), key = key.value(), "User not found in Portal");
            return Ok(None);
        };

        let identity = match self.materializer.materialize(realm_id, &profile).await {
            Ok(identity) => identity,
            Err(FederationError::AttributeMapping(msg)) => {
                tracing::warn!(kind = key.kind(), key = key.value(), error = %msg, "Unusable Portal profile");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.cache.put(key.value(), identity.clone());
        Ok(Some(identity))
    }
}

impl UserStorageProvider for PortalUserFederationProvider {
    fn config(&self) -> &FederationConfig {
        &self.config
    }

    fn provider_type(&self) -> &'static str {
        PROVIDER_TYPE
    }

    async fn validate_config(&self) -> FederationResult<()> {
        PortalConfig::from_federation_config(&self.config)?;
        Ok(())
    }

    async fn close(&self) -> FederationResult<()> {
        self.cache.clear();
        Ok(())
    }
}

impl UserLookupProvider for PortalUserFederationProvider {
    async fn get_user_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> FederationResult<Option<LocalIdentity>> {
        tracing::info!(username, "Getting user by username");
        self.resolve(realm_id, LookupKey::Username(username)).await
    }

    async fn get_user_by_email(
        &self,
        realm_id: Uuid,
        email: &str,
    ) -> FederationResult<Option<LocalIdentity>> {
        tracing::info!(email, "Getting user by email");
        self.resolve(realm_id, LookupKey::Email(email)).await
    }
}

impl CredentialInputValidator for PortalUserFederationProvider {
    fn supports_credential_type(&self, credential_type: CredentialType) -> bool {
        credential_type == CredentialType::Password
    }

    fn is_configured_for(
        &self,
        _realm_id: Uuid,
        user: &LocalIdentity,
        credential_type: CredentialType,
    ) -> bool {
        self.supports_credential_type(credential_type) && user.is_linked_to(self.config.id)
    }

    /// Validates a password against the Portal.
    ///
    /// On success the password becomes the identity's local credential and
    /// the federation link is cleared, so later logins never reach the
    /// Portal.
    ///
    /// ## Security
    ///
    /// The password is never logged.
    async fn is_valid(
        &self,
        realm_id: Uuid,
        user: &mut LocalIdentity,
        input: &CredentialInput,
    ) -> FederationResult<bool> {
        let CredentialInput::User(credential) = input else {
            tracing::debug!(username = %user.username, "Ignoring stored credential input");
            return Ok(false);
        };
        if !self.supports_credential_type(credential.credential_type) {
            return Ok(false);
        }
        if !user.is_linked_to(self.config.id) {
            tracing::warn!(
                username = %user.username,
                "Credential validation requested for identity not linked to this provider"
            );
            return Ok(false);
        }
        let Some(email) = user.email.clone() else {
            tracing::warn!(username = %user.username, "Cannot validate credentials without an email");
            return Ok(false);
        };

        let verdict = self
            .directory
            .validate_credentials(&email, &credential.challenge_response)
            .await;
        if !verdict.is_valid() {
            tracing::info!(username = %user.username, verdict = %verdict, "Portal did not confirm credentials");
            return Ok(false);
        }

        self.session
            .credentials()
            .update_password(realm_id, user.id, &credential.challenge_response)
            .await?;

        let mut migrated = user.clone();
        migrated.clear_federation_link();
        self.session.users().update(&migrated).await?;

        *user = migrated;
        self.cache.refresh(user);

        tracing::info!(
            username = %user.username,
            user_id = %user.id,
            "Migrated identity to local credentials"
        );
        Ok(true)
    }
}
