//! Local user store trait.

use async_trait::async_trait;
use pf_model::LocalIdentity;
use uuid::Uuid;

use crate::error::StorageResult;

/// Host-owned store of local identities.
///
/// Implementations must be thread-safe and must enforce uniqueness of
/// `username` within a realm. That constraint is what arbitrates two
/// concurrent units of work materializing the same Portal user.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new identity.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if the username is taken in the realm.
    async fn create(&self, user: &LocalIdentity) -> StorageResult<()>;

    /// Updates an existing identity.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the identity doesn't exist and
    /// `StorageError::InvalidData` if the update would change the username.
    async fn update(&self, user: &LocalIdentity) -> StorageResult<()>;

    /// Gets an identity by ID.
    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<LocalIdentity>>;

    /// Gets an identity by username.
    async fn get_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> StorageResult<Option<LocalIdentity>>;

    /// Gets an identity by email.
    async fn get_by_email(&self, realm_id: Uuid, email: &str)
    -> StorageResult<Option<LocalIdentity>>;
}
