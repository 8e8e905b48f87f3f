//! Command implementations.

mod check;
mod lookup;
mod resolve;

pub use check::run_check_config;
pub use lookup::{run_lookup, run_validate};
pub use resolve::run_resolve;

use std::sync::Arc;

use pf_federation::UserStorageProviderFactory;
use pf_federation_portal::{PortalClient, PortalConfig, PortalProviderFactory};
use uuid::Uuid;

use crate::cli::PortalArgs;

/// Validates the arguments and builds a Portal client from them.
fn portal_client(args: &PortalArgs) -> anyhow::Result<PortalClient> {
    let config = args.federation_config(Uuid::now_v7())?;
    PortalProviderFactory::new().validate_configuration(&config)?;
    let portal = PortalConfig::from_federation_config(&config)?;
    Ok(PortalClient::new(Arc::new(portal))?)
}
