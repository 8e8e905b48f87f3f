//! Federation provider traits.
//!
//! The host discovers a provider through its [`UserStorageProviderFactory`],
//! creates one provider per unit of work, and drives it through the
//! capability traits below.

use std::fmt;
use std::sync::Arc;

use pf_model::{CredentialInput, CredentialType, LocalIdentity};
use pf_storage::{CredentialStore, UserStore};
use uuid::Uuid;

use crate::config::{ConfigProperty, FederationConfig};
use crate::error::FederationResult;
use crate::storage_id::StorageId;

// ============================================================================
// Session
// ============================================================================

/// Host services available to a provider for one unit of work.
#[derive(Clone)]
pub struct FederationSession {
    users: Arc<dyn UserStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl FederationSession {
    /// Creates a session over the host's local stores.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { users, credentials }
    }

    /// Returns the local user store.
    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Returns the local credential store.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }
}

impl fmt::Debug for FederationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederationSession").finish_non_exhaustive()
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle surface every federation provider implements.
#[allow(async_fn_in_trait)]
pub trait UserStorageProvider: Send + Sync {
    /// Returns the provider configuration.
    fn config(&self) -> &FederationConfig;

    /// Returns the provider type identifier.
    fn provider_type(&self) -> &'static str;

    /// Validates the provider configuration.
    async fn validate_config(&self) -> FederationResult<()>;

    /// Closes the provider at the end of its unit of work.
    async fn close(&self) -> FederationResult<()> {
        Ok(())
    }
}

// ============================================================================
// User Lookup
// ============================================================================

/// Resolves users by id, username and email.
///
/// Each lookup returns `Ok(None)` when the user cannot be resolved,
/// including when the external directory is unreachable. `Err` is reserved
/// for failures of the host's own stores.
#[allow(async_fn_in_trait)]
pub trait UserLookupProvider: UserStorageProvider {
    /// Gets a user by storage-qualified id.
    ///
    /// The external part of the id is the username. Ids qualified with a
    /// different provider resolve to `None`.
    async fn get_user_by_id(
        &self,
        realm_id: Uuid,
        id: &str,
    ) -> FederationResult<Option<LocalIdentity>> {
        let storage_id = StorageId::parse(id);
        if !storage_id.belongs_to(&self.config().id.to_string())
            || storage_id.external_id().trim().is_empty()
        {
            return Ok(None);
        }
        self.get_user_by_username(realm_id, storage_id.external_id())
            .await
    }

    /// Gets a user by username.
    async fn get_user_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> FederationResult<Option<LocalIdentity>>;

    /// Gets a user by email.
    async fn get_user_by_email(
        &self,
        realm_id: Uuid,
        email: &str,
    ) -> FederationResult<Option<LocalIdentity>>;
}

// ============================================================================
// Credential Validation
// ============================================================================

/// Validates credentials against an external system.
///
/// ## Security
///
/// Implementations must never log the challenge response.
#[allow(async_fn_in_trait)]
pub trait CredentialInputValidator: Send + Sync {
    /// Checks if the validator handles the credential type at all.
    fn supports_credential_type(&self, credential_type: CredentialType) -> bool;

    /// Checks if the validator should be asked about this user's credential.
    fn is_configured_for(
        &self,
        realm_id: Uuid,
        user: &LocalIdentity,
        credential_type: CredentialType,
    ) -> bool;

    /// Validates a credential for the user.
    ///
    /// Implementations may update `user` (and persist it) as a side effect
    /// of a successful validation.
    async fn is_valid(
        &self,
        realm_id: Uuid,
        user: &mut LocalIdentity,
        input: &CredentialInput,
    ) -> FederationResult<bool>;
}

// ============================================================================
// Factory
// ============================================================================

/// Creates provider instances and describes their configuration.
///
/// Factories are long-lived; providers are created per unit of work.
pub trait UserStorageProviderFactory: Send + Sync {
    /// Provider type produced by this factory.
    type Provider: UserStorageProvider;

    /// Returns the unique identifier for this factory.
    fn id(&self) -> &'static str;

    /// Returns help text for the admin surface.
    fn help_text(&self) -> &'static str {
        ""
    }

    /// Describes the provider-specific configuration keys.
    fn config_properties(&self) -> Vec<ConfigProperty>;

    /// Validates a configuration before it is saved or used.
    ///
    /// ## Errors
    ///
    /// Returns a configuration error describing the first problem found.
    fn validate_configuration(&self, config: &FederationConfig) -> FederationResult<()>;

    /// Creates a provider for one unit of work.
    ///
    /// ## Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    fn create(
        &self,
        config: &FederationConfig,
        session: FederationSession,
    ) -> FederationResult<Self::Provider>;
}
