//! `check-config` command.

use pf_federation::UserStorageProviderFactory;
use pf_federation_portal::{PortalConfig, PortalProviderFactory};
use serde_json::json;
use uuid::Uuid;

use crate::cli::PortalArgs;
use crate::output;

/// Validates the Portal settings and prints the endpoints they lead to.
///
/// ## Errors
///
/// Returns the first configuration problem found.
pub fn run_check_config(args: &PortalArgs) -> anyhow::Result<()> {
    let factory = PortalProviderFactory::new();
    let config = args.federation_config(Uuid::now_v7())?;
    factory.validate_configuration(&config)?;

    let portal = PortalConfig::from_federation_config(&config)?;
    output::success(&format!("Configuration for {} is valid", factory.id()));

    let properties: Vec<_> = factory
        .config_properties()
        .into_iter()
        .map(|p| json!({ "name": p.name, "label": p.label, "secret": p.secret }))
        .collect();

    output::json(&json!({
        "baseUrl": portal.base_url(),
        "companyId": portal.company_id(),
        "connectTimeoutSecs": portal.connection_timeout.as_secs(),
        "readTimeoutSecs": portal.read_timeout.as_secs(),
        "endpoints": {
            "screenName": portal.screen_name_url("{screenName}")?.as_str(),
            "emailAddress": portal.email_address_url("{emailAddress}")?.as_str(),
            "validateCredentials": portal.validate_credentials_url()?.as_str(),
        },
        "properties": properties,
    }))
}
