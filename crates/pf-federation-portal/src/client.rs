//! Portal HTTP client.
//!
//! [`RemoteDirectory`] is the seam between the provider and the Portal.
//! [`PortalClient`] implements it over `reqwest`; each public operation
//! absorbs failures, while the `try_*` forms keep the reason in the type.
//!
//! ## Security
//!
//! - Every call carries HTTP Basic auth built from the configured principal
//!   and secret; the header is marked sensitive
//! - Passwords are never logged

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Response;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use url::Url;

use crate::config::PortalConfig;
use crate::dto::{CredentialsResponse, RemoteProfile, UserCredentials};
use crate::error::{PortalError, PortalResult};

const APPLICATION_JSON: &str = "application/json";

// ============================================================================
// Remote Directory
// ============================================================================

/// Outcome of a remote credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialVerdict {
    /// The Portal accepted the credentials.
    Valid,
    /// The Portal answered that the credentials are wrong.
    Invalid,
    /// No usable answer: transport failure, header failure or bad body.
    Unreachable(String),
    /// The Portal answered with a non-success status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },
}

impl CredentialVerdict {
    /// Returns true only for [`CredentialVerdict::Valid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for CredentialVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::Invalid => f.write_str("invalid"),
            Self::Unreachable(reason) => write!(f, "unreachable: {reason}"),
            Self::Rejected { status, .. } => write!(f, "rejected with status {status}"),
        }
    }
}

/// External directory of user profiles and credentials.
///
/// Implementations never fail: an unreachable or misbehaving directory
/// reads as "no such user" for lookups and as a non-valid verdict for
/// credential checks.
#[async_trait]
pub trait RemoteDirectory: Send + Sync {
    /// Fetches a profile by login handle.
    async fn fetch_by_username(&self, username: &str) -> Option<RemoteProfile>;

    /// Fetches a profile by email.
    async fn fetch_by_email(&self, email: &str) -> Option<RemoteProfile>;

    /// Checks an email and password pair.
    async fn validate_credentials(&self, email: &str, password: &str) -> CredentialVerdict;
}

// ============================================================================
// Portal Client
// ============================================================================

/// [`RemoteDirectory`] backed by the Portal JSON API.
#[derive(Debug, Clone)]
pub struct PortalClient {
    config: Arc<PortalConfig>,
    http: reqwest::Client,
}

impl PortalClient {
    /// Creates a client for the configured Portal.
    ///
    /// Connections are not kept idle between calls.
    ///
    /// ## Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(config: Arc<PortalConfig>) -> PortalResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connection_timeout)
            .timeout(config.read_timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { config, http })
    }

    /// Returns the Portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Fetches a profile by screen name, keeping the failure reason.
    ///
    /// ## Errors
    ///
    /// Returns the transport, status or decode failure of the call.
    pub async fn try_fetch_by_username(&self, username: &str) -> PortalResult<RemoteProfile> {
        let url = self.config.screen_name_url(username)?;
        self.fetch_profile(url).await
    }

    /// Fetches a profile by email, keeping the failure reason.
    ///
    /// ## Errors
    ///
    /// Returns the transport, status or decode failure of the call.
    pub async fn try_fetch_by_email(&self, email: &str) -> PortalResult<RemoteProfile> {
        let url = self.config.email_address_url(email)?;
        self.fetch_profile(url).await
    }

    /// Checks credentials, keeping the failure reason.
    ///
    /// ## Errors
    ///
    /// Returns the transport, status or decode failure of the call.
    pub async fn try_validate(&self, email: &str, password: &str) -> PortalResult<bool> {
        let url = self.config.validate_credentials_url()?;
        tracing::info!(url = %url, "Validating user credentials via Portal");

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.authorization()?)
            .json(&UserCredentials { email, password })
            .send()
            .await?;

        let body = ensure_success(response).await?.bytes().await?;
        let decoded: CredentialsResponse = serde_json::from_slice(&body)?;
        tracing::debug!(valid = decoded.valid, "Read credential validation response");

        Ok(decoded.valid)
    }

    async fn fetch_profile(&self, url: Url) -> PortalResult<RemoteProfile> {
        tracing::info!(url = %url, "Fetching user data from Portal");

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.authorization()?)
            .header(ACCEPT, APPLICATION_JSON)
            .send()
            .await?;

        let body = ensure_success(response).await?.bytes().await?;
        let profile: RemoteProfile = serde_json::from_slice(&body)?;

        tracing::info!(
            screen_name = %profile.screen_name,
            email = profile.email_address.as_deref().unwrap_or_default(),
            "Read user data from Portal"
        );
        tracing::debug!(?profile, "Portal profile");

        Ok(profile)
    }

    fn authorization(&self) -> PortalResult<HeaderValue> {
        basic_auth_header(self.config.auth_principal(), self.config.auth_secret())
    }
}

#[async_trait]
impl RemoteDirectory for PortalClient {
    async fn fetch_by_username(&self, username: &str) -> Option<RemoteProfile> {
        self.try_fetch_by_username(username)
            .await
            .map_err(|e| log_fetch_error(&e))
            .ok()
    }

    async fn fetch_by_email(&self, email: &str) -> Option<RemoteProfile> {
        self.try_fetch_by_email(email)
            .await
            .map_err(|e| log_fetch_error(&e))
            .ok()
    }

    async fn validate_credentials(&self, email: &str, password: &str) -> CredentialVerdict {
        match self.try_validate(email, password).await {
            Ok(true) => CredentialVerdict::Valid,
            Ok(false) => CredentialVerdict::Invalid,
            Err(PortalError::Status { status, body }) => {
                tracing::error!(
                    status,
                    body = %body,
                    "Error validating user credentials: unsuccessful status"
                );
                CredentialVerdict::Rejected { status, body }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error validating user credentials");
                CredentialVerdict::Unreachable(e.to_string())
            }
        }
    }
}

fn log_fetch_error(err: &PortalError) {
    match err {
        PortalError::Status { status, body } => tracing::error!(
            status,
            body = %body,
            "Error fetching user data: unsuccessful status"
        ),
        _ => tracing::error!(error = %err, "Error fetching user data"),
    }
}

async fn ensure_success(response: Response) -> PortalResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PortalError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Builds an HTTP Basic `Authorization` header value.
///
/// ## Errors
///
/// Returns an auth header error if the principal contains `:`.
pub fn basic_auth_header(principal: &str, secret: &str) -> PortalResult<HeaderValue> {
    if principal.contains(':') {
        return Err(PortalError::AuthHeader(
            "principal must not contain ':'".to_string(),
        ));
    }

    let encoded = STANDARD.encode(format!("{principal}:{secret}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| PortalError::AuthHeader(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
