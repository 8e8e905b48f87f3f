//! `resolve` command.

use std::sync::Arc;

use pf_federation::{FederationSession, UserLookupProvider, UserStorageProviderFactory};
use pf_federation_portal::PortalProviderFactory;
use pf_storage::memory::{InMemoryCredentialStore, InMemoryUserStore};
use uuid::Uuid;

use crate::cli::PortalArgs;
use crate::output;

/// Runs the provider's username lookup against empty in-memory stores and
/// prints the identity it materializes.
///
/// ## Errors
///
/// Returns an error if the configuration is invalid or the user cannot be
/// resolved.
pub async fn run_resolve(args: &PortalArgs, username: &str) -> anyhow::Result<()> {
    let realm_id = Uuid::now_v7();
    let config = args.federation_config(realm_id)?;
    tracing::debug!(realm_id = %realm_id, username, "Resolving against in-memory stores");

    let users = Arc::new(InMemoryUserStore::new());
    let session = FederationSession::new(users.clone(), Arc::new(InMemoryCredentialStore::new()));
    let provider = PortalProviderFactory::new().create(&config, session)?;

    let Some(identity) = provider.get_user_by_username(realm_id, username).await? else {
        anyhow::bail!("user {username} could not be resolved");
    };

    output::success(&format!(
        "Resolved {} ({} local record)",
        identity.username,
        users.len()
    ));
    output::json(&identity)
}
