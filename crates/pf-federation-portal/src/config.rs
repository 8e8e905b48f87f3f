//! Portal provider configuration.
//!
//! The four Portal keys live in the host's [`FederationConfig`] string map.
//! [`PortalConfig`] is the validated, immutable form a provider works with.

use std::fmt;
use std::time::Duration;

use pf_federation::{ConfigProperty, FederationConfig};
use url::Url;

use crate::error::{PortalError, PortalResult};

// ============================================================================
// Configuration Keys
// ============================================================================

/// Base URL of the Portal, e.g. `https://portal.example.com`.
pub const BASE_URL_KEY: &str = "portal-base-url";

/// Tenant (company) id sent with every lookup.
pub const COMPANY_ID_KEY: &str = "portal-company-id";

/// Basic auth user for the Portal calls.
pub const AUTH_PRINCIPAL_KEY: &str = "auth-principal";

/// Basic auth password for the Portal calls.
pub const AUTH_SECRET_KEY: &str = "auth-secret";

/// Keys that must be present and non-blank, in validation order.
pub const REQUIRED_KEYS: [&str; 4] = [
    BASE_URL_KEY,
    COMPANY_ID_KEY,
    AUTH_PRINCIPAL_KEY,
    AUTH_SECRET_KEY,
];

const SCREEN_NAME_PATH: &str = "/api/jsonws/user/get-user-by-screen-name";
const EMAIL_ADDRESS_PATH: &str = "/api/jsonws/user/get-user-by-email-address";
const VALIDATE_CREDENTIALS_PATH: &str = "/o/validateUserCredentials";

/// Describes the Portal keys to the admin surface.
#[must_use]
pub fn config_properties() -> Vec<ConfigProperty> {
    vec![
        ConfigProperty::string(BASE_URL_KEY, "Portal base url")
            .help("Scheme, host and optional path prefix of the Portal"),
        ConfigProperty::string(COMPANY_ID_KEY, "Portal company id")
            .help("Tenant identifier passed to the user lookup endpoints"),
        ConfigProperty::string(
            AUTH_PRINCIPAL_KEY,
            "Auth Principal for the credential validation/user data calls",
        )
        .secret(),
        ConfigProperty::string(
            AUTH_SECRET_KEY,
            "Auth Secret for the credential validation/user data calls",
        )
        .secret(),
    ]
}

// ============================================================================
// PortalConfig
// ============================================================================

/// Validated Portal connection settings.
#[derive(Clone)]
pub struct PortalConfig {
    base_url: String,
    company_id: String,
    auth_principal: String,
    auth_secret: String,
    /// Connect timeout for each call.
    pub connection_timeout: Duration,
    /// Overall timeout for each call.
    pub read_timeout: Duration,
}

impl PortalConfig {
    /// Builds the Portal settings from a provider configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error naming the first missing or blank key, a
    /// configuration error if the auth principal contains `:`, or an
    /// invalid URL error if the base URL is not an absolute http(s) URL.
    pub fn from_federation_config(config: &FederationConfig) -> PortalResult<Self> {
        let value = |key: &str| {
            config
                .get_non_empty(key)
                .map(str::to_string)
                .ok_or_else(|| PortalError::MissingProperty(key.to_string()))
        };

        let base_url = value(BASE_URL_KEY)?;
        let company_id = value(COMPANY_ID_KEY)?;
        let auth_principal = value(AUTH_PRINCIPAL_KEY)?;
        let auth_secret = value(AUTH_SECRET_KEY)?;

        // Basic auth splits user and password on the first ':'
        if auth_principal.contains(':') {
            return Err(PortalError::config(format!(
                "property '{AUTH_PRINCIPAL_KEY}' must not contain ':'"
            )));
        }

        let parsed = Url::parse(base_url.trim())
            .map_err(|e| PortalError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PortalError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        let base_url = base_url.trim();
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();

        Ok(Self {
            base_url,
            company_id,
            auth_principal,
            auth_secret,
            connection_timeout: config.connection_timeout,
            read_timeout: config.read_timeout,
        })
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the tenant id.
    #[must_use]
    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    /// Returns the basic auth user.
    #[must_use]
    pub fn auth_principal(&self) -> &str {
        &self.auth_principal
    }

    /// Returns the basic auth password.
    ///
    /// ## Security
    ///
    /// The value must never be logged.
    #[must_use]
    pub fn auth_secret(&self) -> &str {
        &self.auth_secret
    }

    /// URL of the lookup-by-screen-name endpoint.
    ///
    /// ## Errors
    ///
    /// Returns an invalid URL error if the endpoint cannot be formed.
    pub fn screen_name_url(&self, screen_name: &str) -> PortalResult<Url> {
        self.lookup_url(SCREEN_NAME_PATH, "screenName", screen_name)
    }

    /// URL of the lookup-by-email endpoint.
    ///
    /// ## Errors
    ///
    /// Returns an invalid URL error if the endpoint cannot be formed.
    pub fn email_address_url(&self, email: &str) -> PortalResult<Url> {
        self.lookup_url(EMAIL_ADDRESS_PATH, "emailAddress", email)
    }

    /// URL of the credential validation endpoint.
    ///
    /// ## Errors
    ///
    /// Returns an invalid URL error if the endpoint cannot be formed.
    pub fn validate_credentials_url(&self) -> PortalResult<Url> {
        self.endpoint(VALIDATE_CREDENTIALS_PATH)
    }

    fn lookup_url(&self, path: &str, param: &str, value: &str) -> PortalResult<Url> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("companyId", &self.company_id)
            .append_pair(param, value);
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> PortalResult<Url> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|e| PortalError::InvalidUrl(format!("{raw}: {e}")))
    }
}

impl fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalConfig")
            .field("base_url", &self.base_url)
            .field("company_id", &self.company_id)
            .field("auth_principal", &"[REDACTED]")
            .field("auth_secret", &"[REDACTED]")
            .field("connection_timeout", &self.connection_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}
