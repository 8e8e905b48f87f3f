//! CLI argument parsing.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use pf_federation::FederationConfig;
use pf_federation_portal::PROVIDER_TYPE;
use pf_federation_portal::config::{
    AUTH_PRINCIPAL_KEY, AUTH_SECRET_KEY, BASE_URL_KEY, COMPANY_ID_KEY,
};
use uuid::Uuid;

/// Portal federation CLI - checks and exercises a Portal federation setup.
#[derive(Debug, Parser)]
#[command(name = "pf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Portal connection settings.
    #[command(flatten)]
    pub portal: PortalArgs,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Portal connection settings.
#[derive(Debug, Clone, Args)]
pub struct PortalArgs {
    /// Portal base URL.
    #[arg(long, env = "PORTAL_BASE_URL", default_value = "")]
    pub base_url: String,

    /// Portal company id.
    #[arg(long, env = "PORTAL_COMPANY_ID", default_value = "")]
    pub company_id: String,

    /// Basic auth user for the Portal calls.
    #[arg(long, env = "PORTAL_AUTH_PRINCIPAL", default_value = "", hide_env_values = true)]
    pub auth_principal: String,

    /// Basic auth password for the Portal calls.
    #[arg(long, env = "PORTAL_AUTH_SECRET", default_value = "", hide_env_values = true)]
    pub auth_secret: String,

    /// Connect timeout in seconds.
    #[arg(long, env = "PORTAL_CONNECT_TIMEOUT", default_value_t = 5)]
    pub connect_timeout: u64,

    /// Overall request timeout in seconds.
    #[arg(long, env = "PORTAL_READ_TIMEOUT", default_value_t = 30)]
    pub read_timeout: u64,
}

impl PortalArgs {
    /// Builds the provider configuration the host would store.
    ///
    /// Blank values are kept so validation can name them.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration cannot be assembled.
    pub fn federation_config(&self, realm_id: Uuid) -> anyhow::Result<FederationConfig> {
        let config = FederationConfig::builder()
            .realm_id(realm_id)
            .provider_type(PROVIDER_TYPE)
            .name("Portal")
            .config(BASE_URL_KEY, self.base_url.as_str())
            .config(COMPANY_ID_KEY, self.company_id.as_str())
            .config(AUTH_PRINCIPAL_KEY, self.auth_principal.as_str())
            .config(AUTH_SECRET_KEY, self.auth_secret.as_str())
            .connection_timeout(Duration::from_secs(self.connect_timeout))
            .read_timeout(Duration::from_secs(self.read_timeout))
            .build()?;
        Ok(config)
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the Portal configuration without contacting the Portal.
    CheckConfig,

    /// Fetch a raw Portal profile.
    Lookup(LookupArgs),

    /// Check a password against the Portal.
    ///
    /// The password is read from `PORTAL_VALIDATE_PASSWORD` or prompted for.
    Validate {
        /// Email identifying the account.
        #[arg(long)]
        email: String,
    },

    /// Run the full lookup flow against in-memory stores.
    Resolve {
        /// Username to resolve.
        #[arg(long)]
        username: String,
    },
}

/// Lookup key, by username or by email.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct LookupArgs {
    /// Portal screen name.
    #[arg(long)]
    pub username: Option<String>,

    /// Portal email address.
    #[arg(long)]
    pub email: Option<String>,
}
