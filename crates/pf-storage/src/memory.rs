//! In-memory store implementations.
//!
//! These back the integration tests and the CLI's `resolve` command. They
//! honour the same contracts as a database-backed store: usernames are
//! unique per realm and passwords are hashed with Argon2id before they are
//! kept.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pf_model::{Credential, CredentialType, LocalIdentity};
use uuid::Uuid;

use crate::credential::CredentialStore;
use crate::error::{StorageError, StorageResult};
use crate::user::UserStore;

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, LocalIdentity>,
    /// (realm, username) -> user id. The unique index.
    usernames: DashMap<(Uuid, String), Uuid>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if the store holds no identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &LocalIdentity) -> StorageResult<()> {
        match self.usernames.entry((user.realm_id, user.username.clone())) {
            Entry::Occupied(_) => Err(StorageError::duplicate(
                "User",
                "username",
                user.username.as_str(),
            )),
            Entry::Vacant(slot) => {
                // The record goes in before the index entry so readers that
                // find the username always find the record.
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(())
            }
        }
    }

    async fn update(&self, user: &LocalIdentity) -> StorageResult<()> {
        let mut existing = self
            .users
            .get_mut(&user.id)
            .filter(|existing| existing.realm_id == user.realm_id)
            .ok_or_else(|| StorageError::not_found("User", user.id))?;

        if existing.username != user.username {
            return Err(StorageError::InvalidData(format!(
                "username of user {} is immutable",
                user.id
            )));
        }

        *existing = user.clone();
        Ok(())
    }

    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<LocalIdentity>> {
        Ok(self
            .users
            .get(&id)
            .filter(|user| user.realm_id == realm_id)
            .map(|user| user.value().clone()))
    }

    async fn get_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> StorageResult<Option<LocalIdentity>> {
        let Some(id) = self
            .usernames
            .get(&(realm_id, username.to_string()))
            .map(|id| *id.value())
        else {
            return Ok(None);
        };

        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }

    async fn get_by_email(
        &self,
        realm_id: Uuid,
        email: &str,
    ) -> StorageResult<Option<LocalIdentity>> {
        Ok(self
            .users
            .iter()
            .find(|user| {
                user.realm_id == realm_id
                    && user
                        .email
                        .as_deref()
                        .is_some_and(|stored| stored.eq_ignore_ascii_case(email))
            })
            .map(|user| user.value().clone()))
    }
}

/// In-memory [`CredentialStore`] hashing passwords with Argon2id.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    /// (realm, user) -> credentials.
    credentials: DashMap<(Uuid, Uuid), Vec<Credential>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a plaintext password against the user's stored password hash.
    #[must_use]
    pub fn verify_password(&self, realm_id: Uuid, user_id: Uuid, password: &str) -> bool {
        let Some(credentials) = self.credentials.get(&(realm_id, user_id)) else {
            return false;
        };

        credentials
            .iter()
            .filter(|c| c.credential_type == CredentialType::Password)
            .any(|c| {
                PasswordHash::new(&c.secret_data).is_ok_and(|hash| {
                    Argon2::default()
                        .verify_password(password.as_bytes(), &hash)
                        .is_ok()
                })
            })
    }

    /// Returns true if the user has any stored credential.
    #[must_use]
    pub fn has_credentials(&self, realm_id: Uuid, user_id: Uuid) -> bool {
        self.credentials
            .get(&(realm_id, user_id))
            .is_some_and(|credentials| !credentials.is_empty())
    }
}

fn hash_password(password: &str) -> StorageResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StorageError::Internal(e.to_string()))
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn update_password(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        password: &str,
    ) -> StorageResult<()> {
        let secret_data = hash_password(password)?;
        let credential = Credential::new_password(user_id, realm_id, secret_data);

        let mut credentials = self.credentials.entry((realm_id, user_id)).or_default();
        credentials.retain(|c| c.credential_type != CredentialType::Password);
        credentials.push(credential);

        tracing::debug!(%user_id, "Replaced password credential");
        Ok(())
    }

    async fn list_by_user(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<Vec<Credential>> {
        Ok(self
            .credentials
            .get(&(realm_id, user_id))
            .map(|credentials| credentials.value().clone())
            .unwrap_or_default())
    }
}
