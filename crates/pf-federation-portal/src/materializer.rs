//! Shadow record creation.
//!
//! A Portal profile becomes a local identity the first time it is seen.
//! Existing records are reused verbatim, never refreshed from the Portal.

use std::sync::Arc;

use pf_federation::{FederationError, FederationResult};
use pf_model::LocalIdentity;
use pf_storage::{StorageError, UserStore};
use uuid::Uuid;

use crate::dto::RemoteProfile;

/// Turns Portal profiles into local identities linked to a provider.
pub struct ShadowRecordMaterializer {
    provider_id: Uuid,
    users: Arc<dyn UserStore>,
}

impl ShadowRecordMaterializer {
    /// Creates a materializer that links new records to `provider_id`.
    #[must_use]
    pub fn new(provider_id: Uuid, users: Arc<dyn UserStore>) -> Self {
        Self { provider_id, users }
    }

    /// Returns the local identity for `profile`, creating it if needed.
    ///
    /// A concurrent creation of the same username by another unit of work
    /// is resolved by re-reading the winner's record.
    ///
    /// ## Errors
    ///
    /// Returns an attribute mapping error for an empty screen name, and a
    /// storage error if the local store fails.
    pub async fn materialize(
        &self,
        realm_id: Uuid,
        profile: &RemoteProfile,
    ) -> FederationResult<LocalIdentity> {
        let username = profile.screen_name.as_str();
        if username.trim().is_empty() {
            return Err(FederationError::mapping(
                "Portal profile has an empty screen name",
            ));
        }

        if let Some(existing) = self.users.get_by_username(realm_id, username).await? {
            tracing::debug!(username, user_id = %existing.id, "Reusing local identity");
            return Ok(existing);
        }

        let identity = self.shadow_record(realm_id, profile);
        match self.users.create(&identity).await {
            Ok(()) => {
                tracing::info!(
                    username,
                    user_id = %identity.id,
                    enabled = identity.enabled,
                    provider_id = %self.provider_id,
                    "Created local identity from Portal profile"
                );
                Ok(identity)
            }
            Err(e) if e.is_duplicate() => {
                tracing::warn!(username, "Local identity created concurrently, re-reading it");
                self.users
                    .get_by_username(realm_id, username)
                    .await?
                    .ok_or_else(|| StorageError::not_found_by_name("User", username).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn shadow_record(&self, realm_id: Uuid, profile: &RemoteProfile) -> LocalIdentity {
        let mut identity = LocalIdentity::new(realm_id, profile.screen_name.as_str())
            .with_enabled(profile.is_approved())
            .with_federation_link(self.provider_id);
        identity.email.clone_from(&profile.email_address);
        identity.first_name.clone_from(&profile.first_name);
        identity.last_name.clone_from(&profile.last_name);
        identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pf_storage::StorageResult;
    use pf_storage::memory::InMemoryUserStore;

    fn profile(status: i32) -> RemoteProfile {
        RemoteProfile {
            email_address: Some("jdoe@example.com".to_string()),
            screen_name: "jdoe".to_string(),
            first_name: Some("John".to_string()),
            last_name: None,
            status,
        }
    }

    // Store where another writer always gets the username in first
    struct RacingUserStore {
        inner: InMemoryUserStore,
        winner: Option<LocalIdentity>,
    }

    #[async_trait]
    impl UserStore for RacingUserStore {
        async fn create(&self, user: &LocalIdentity) -> StorageResult<()> {
            if let Some(winner) = &self.winner {
                self.inner.create(winner).await?;
            }
            self.inner.create(user).await
        }

        async fn update(&self, user: &LocalIdentity) -> StorageResult<()> {
            self.inner.update(user).await
        }

        async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<LocalIdentity>> {
            self.inner.get_by_id(realm_id, id).await
        }

        async fn get_by_username(
            &self,
            realm_id: Uuid,
            username: &str,
        ) -> StorageResult<Option<LocalIdentity>> {
            self.inner.get_by_username(realm_id, username).await
        }

        async fn get_by_email(
            &self,
            realm_id: Uuid,
            email: &str,
        ) -> StorageResult<Option<LocalIdentity>> {
            self.inner.get_by_email(realm_id, email).await
        }
    }

    #[tokio::test]
    async fn creates_linked_record() {
        let provider_id = Uuid::now_v7();
        let realm_id = Uuid::now_v7();
        let users = Arc::new(InMemoryUserStore::new());
        let materializer = ShadowRecordMaterializer::new(provider_id, users.clone());

        let identity = materializer.materialize(realm_id, &profile(0)).await.unwrap();

        assert_eq!(identity.username, "jdoe");
        assert_eq!(identity.email.as_deref(), Some("jdoe@example.com"));
        assert_eq!(identity.first_name.as_deref(), Some("John"));
        assert_eq!(identity.last_name, None);
        assert!(identity.enabled);
        assert!(identity.is_linked_to(provider_id));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn inactive_profile_is_disabled() {
        let users = Arc::new(InMemoryUserStore::new());
        let materializer = ShadowRecordMaterializer::new(Uuid::now_v7(), users);

        let identity = materializer
            .materialize(Uuid::now_v7(), &profile(5))
            .await
            .unwrap();

        assert!(!identity.enabled);
    }

    #[tokio::test]
    async fn existing_record_is_reused_verbatim() {
        let realm_id = Uuid::now_v7();
        let users = Arc::new(InMemoryUserStore::new());
        let local = LocalIdentity::new(realm_id, "jdoe").with_email("old@example.com");
        users.create(&local).await.unwrap();

        let materializer = ShadowRecordMaterializer::new(Uuid::now_v7(), users.clone());
        let first = materializer.materialize(realm_id, &profile(5)).await.unwrap();

        let mut renamed = profile(0);
        renamed.first_name = Some("Johnny".to_string());
        renamed.last_name = Some("Doering".to_string());
        let second = materializer.materialize(realm_id, &renamed).await.unwrap();

        assert_eq!(first, local);
        assert_eq!(second, local);
        assert!(!first.is_federated());
        assert_eq!(users.len(), 1);

        let stored = users.get_by_username(realm_id, "jdoe").await.unwrap().unwrap();
        assert_eq!(stored.first_name, None);
        assert_eq!(stored.last_name, None);
    }

    #[tokio::test]
    async fn duplicate_create_returns_winner() {
        let realm_id = Uuid::now_v7();
        let winner = LocalIdentity::new(realm_id, "jdoe").with_email("winner@example.com");
        let users = Arc::new(RacingUserStore {
            inner: InMemoryUserStore::new(),
            winner: Some(winner.clone()),
        });

        let materializer = ShadowRecordMaterializer::new(Uuid::now_v7(), users.clone());
        let identity = materializer.materialize(realm_id, &profile(0)).await.unwrap();

        assert_eq!(identity, winner);
        assert_eq!(users.inner.len(), 1);
    }

    #[tokio::test]
    async fn empty_screen_name_is_rejected() {
        let users = Arc::new(InMemoryUserStore::new());
        let materializer = ShadowRecordMaterializer::new(Uuid::now_v7(), users.clone());

        let mut blank = profile(0);
        blank.screen_name = "  ".to_string();

        let err = materializer
            .materialize(Uuid::now_v7(), &blank)
            .await
            .unwrap_err();
        assert!(matches!(err, FederationError::AttributeMapping(_)));
        assert!(users.is_empty());
    }
}
