//! `lookup` and `validate` commands.

use pf_federation_portal::{CredentialVerdict, RemoteDirectory};

use super::portal_client;
use crate::cli::{LookupArgs, PortalArgs};
use crate::output;

/// Fetches a raw profile and prints it.
///
/// ## Errors
///
/// Returns the configuration, transport, status or decode failure.
pub async fn run_lookup(args: &PortalArgs, lookup: &LookupArgs) -> anyhow::Result<()> {
    let client = portal_client(args)?;

    let profile = match (&lookup.username, &lookup.email) {
        (Some(username), _) => client.try_fetch_by_username(username).await?,
        (None, Some(email)) => client.try_fetch_by_email(email).await?,
        (None, None) => anyhow::bail!("either --username or --email is required"),
    };

    if !profile.is_approved() {
        output::warning(&format!(
            "Portal account {} is not approved (status {})",
            profile.screen_name, profile.status
        ));
    }
    output::json(&profile)
}

/// Environment variable holding the password to check.
pub const PASSWORD_ENV: &str = "PORTAL_VALIDATE_PASSWORD";

/// Checks a password against the Portal and prints the verdict.
///
/// The password comes from [`PASSWORD_ENV`] when set, otherwise from a
/// hidden prompt. It is never accepted as an argument.
///
/// ## Errors
///
/// Returns an error unless the Portal confirms the credentials.
pub async fn run_validate(args: &PortalArgs, email: &str) -> anyhow::Result<()> {
    let client = portal_client(args)?;

    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => output::prompt_password(&format!("Password for {email}: "))?,
    };
    if password.is_empty() {
        anyhow::bail!("no password given");
    }

    match client.validate_credentials(email, &password).await {
        CredentialVerdict::Valid => {
            output::success(&format!("Credentials for {email} are valid"));
            Ok(())
        }
        CredentialVerdict::Rejected { status, body } => {
            anyhow::bail!("Portal rejected the request with status {status}: {body}")
        }
        verdict => anyhow::bail!("Credentials for {email} not confirmed: {verdict}"),
    }
}
