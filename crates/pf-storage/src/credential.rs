//! Local credential store trait.

use async_trait::async_trait;
use pf_model::Credential;
use uuid::Uuid;

use crate::error::StorageResult;

/// Host-owned store of user credentials.
///
/// ## Security Note
///
/// `update_password` receives a plaintext password. Implementations hash it
/// before persisting and must never log it.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Replaces the user's password credential with the given password.
    async fn update_password(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        password: &str,
    ) -> StorageResult<()>;

    /// Lists all credentials for a user.
    async fn list_by_user(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<Vec<Credential>>;
}
