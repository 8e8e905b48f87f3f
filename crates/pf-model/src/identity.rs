//! Local identity record.
//!
//! A [`LocalIdentity`] lives in the host's local user store. Identities
//! created from a Portal profile carry a federation link until the user's
//! first successful password validation migrates them to local credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record owned by the host's local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalIdentity {
    // === Identity ===
    /// Stable identifier.
    pub id: Uuid,
    /// Realm this identity belongs to.
    pub realm_id: Uuid,
    /// Business key, unique within the realm and immutable once created.
    pub username: String,
    /// Whether the account may log in.
    pub enabled: bool,

    // === Profile ===
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,

    // === Timestamps ===
    /// When the identity was created.
    pub created_at: DateTime<Utc>,
    /// When the identity was last modified.
    pub updated_at: DateTime<Utc>,

    // === Federation ===
    /// Federation provider that still owns credential validation.
    ///
    /// `None` means the identity is fully local.
    pub federation_link: Option<Uuid>,
}

impl LocalIdentity {
    /// Creates an enabled, unlinked identity.
    #[must_use]
    pub fn new(realm_id: Uuid, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            realm_id,
            username: username.into(),
            enabled: true,
            email: None,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
            federation_link: None,
        }
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets whether the identity is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Links the identity to a federation provider.
    #[must_use]
    pub const fn with_federation_link(mut self, provider_id: Uuid) -> Self {
        self.federation_link = Some(provider_id);
        self
    }

    /// Checks if the identity still depends on a federation provider.
    #[must_use]
    pub const fn is_federated(&self) -> bool {
        self.federation_link.is_some()
    }

    /// Checks if the identity is linked to the given provider.
    #[must_use]
    pub fn is_linked_to(&self, provider_id: Uuid) -> bool {
        self.federation_link == Some(provider_id)
    }

    /// Severs the federation link.
    ///
    /// Returns the previous link, if any.
    pub fn clear_federation_link(&mut self) -> Option<Uuid> {
        let previous = self.federation_link.take();
        if previous.is_some() {
            self.updated_at = Utc::now();
        }
        previous
    }

    /// Gets the full name.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}
