//! Credential records and credential inputs.
//!
//! Stored [`Credential`]s belong to the host's credential store.
//! [`CredentialInput`] is what the authentication pipeline hands a
//! validator: either something a user just presented or a stored record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Credential type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// Password credential.
    Password,
    /// One-time password credential.
    Otp,
}

impl CredentialType {
    /// Returns the string representation used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Otp => "otp",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown credential type string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown credential type: {0}")]
pub struct UnknownCredentialType(pub String);

impl FromStr for CredentialType {
    type Err = UnknownCredentialType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(Self::Password),
            "otp" => Ok(Self::Otp),
            other => Err(UnknownCredentialType(other.to_string())),
        }
    }
}

/// A credential persisted by the credential store.
///
/// `secret_data` holds a hash, never the plaintext secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier.
    pub id: Uuid,
    /// User this credential belongs to.
    pub user_id: Uuid,
    /// Realm this credential belongs to.
    pub realm_id: Uuid,
    /// Credential type.
    pub credential_type: CredentialType,
    /// Hashed secret (PHC string for passwords).
    pub secret_data: String,
    /// When the credential was created.
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a password credential from an already hashed secret.
    #[must_use]
    pub fn new_password(user_id: Uuid, realm_id: Uuid, secret_data: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            realm_id,
            credential_type: CredentialType::Password,
            secret_data: secret_data.into(),
            created_at: Utc::now(),
        }
    }
}

/// A credential presented by a user during authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    /// Credential type.
    pub credential_type: CredentialType,
    /// The plaintext challenge response (e.g. the password).
    pub challenge_response: String,
}

impl UserCredential {
    /// Creates a password credential input.
    #[must_use]
    pub fn password(value: impl Into<String>) -> Self {
        Self {
            credential_type: CredentialType::Password,
            challenge_response: value.into(),
        }
    }

    /// Creates a credential input of an arbitrary type.
    #[must_use]
    pub fn new(credential_type: CredentialType, value: impl Into<String>) -> Self {
        Self {
            credential_type,
            challenge_response: value.into(),
        }
    }
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("credential_type", &self.credential_type)
            .field("challenge_response", &"[REDACTED]")
            .finish()
    }
}

/// Input handed to a credential validator.
#[derive(Debug, Clone)]
pub enum CredentialInput {
    /// A credential the user has just presented.
    User(UserCredential),
    /// A stored credential record.
    Stored(Credential),
}

impl CredentialInput {
    /// Returns the type of the wrapped credential.
    #[must_use]
    pub const fn credential_type(&self) -> CredentialType {
        match self {
            Self::User(c) => c.credential_type,
            Self::Stored(c) => c.credential_type,
        }
    }
}

impl From<UserCredential> for CredentialInput {
    fn from(credential: UserCredential) -> Self {
        Self::User(credential)
    }
}
