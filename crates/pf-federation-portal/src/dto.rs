//! Wire types of the Portal JSON API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Portal status value of an approved (active) account.
pub const STATUS_APPROVED: i32 = 0;

/// A user profile as returned by the Portal lookup endpoints.
///
/// Unknown fields are ignored. A missing `status` reads as approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProfile {
    /// Email address.
    #[serde(default)]
    pub email_address: Option<String>,
    /// Login handle, used as the local username.
    pub screen_name: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Account status; `0` is approved, anything else is inactive.
    #[serde(default)]
    pub status: i32,
}

impl RemoteProfile {
    /// Returns true if the Portal account is approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.status == STATUS_APPROVED
    }
}

/// Request body of the credential validation endpoint.
#[derive(Clone, Serialize)]
pub struct UserCredentials<'a> {
    /// Email identifying the account.
    pub email: &'a str,
    /// Password to check.
    pub password: &'a str,
}

impl fmt::Debug for UserCredentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response body of the credential validation endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CredentialsResponse {
    /// Whether the credentials are valid.
    #[serde(default)]
    pub valid: bool,
}
