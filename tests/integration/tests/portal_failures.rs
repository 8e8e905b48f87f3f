//! Behaviour when the Portal is missing users or unavailable.

use std::time::Duration;

use pf_federation::{
    CredentialInputValidator, FederationSession, UserLookupProvider, UserStorageProviderFactory,
};
use pf_federation_portal::{PortalProviderFactory, PortalUserFederationProvider};
use pf_model::{CredentialInput, LocalIdentity, UserCredential};
use pf_storage::UserStore;
use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

use crate::common::{TestEnv, portal_config, profile};

#[tokio::test]
async fn test_unknown_portal_user_is_absent() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.fail_lookups(404, r#"{"exception":"No User exists with the key"}"#)
        .await;

    let provider = env.provider()?;
    assert!(provider.get_user_by_username(env.realm_id, "ghost").await?.is_none());
    assert!(
        provider
            .get_user_by_email(env.realm_id, "ghost@example.com")
            .await?
            .is_none()
    );
    assert!(env.users.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_server_error_is_absent() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.fail_lookups(503, "Service Unavailable").await;

    let user = env
        .provider()?
        .get_user_by_username(env.realm_id, "jdoe")
        .await?;

    assert!(user.is_none());
    assert!(env.users.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_garbage_response_is_absent() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Sign in</html>"))
        .mount(&env.portal)
        .await;

    let user = env
        .provider()?
        .get_user_by_username(env.realm_id, "jdoe")
        .await?;

    assert!(user.is_none());

    Ok(())
}

fn unreachable_provider(env: &TestEnv) -> anyhow::Result<PortalUserFederationProvider> {
    // Nothing listens on port 1
    let config = portal_config(env.realm_id, "http://127.0.0.1:1")?;
    let session = FederationSession::new(env.users.clone(), env.credentials.clone());
    Ok(PortalProviderFactory::new().create(&config, session)?)
}

#[tokio::test]
async fn test_unreachable_portal_is_absent_and_invalid() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let provider = unreachable_provider(&env)?;

    assert!(provider.get_user_by_username(env.realm_id, "jdoe").await?.is_none());

    // An already imported identity cannot be validated while the Portal is down
    let mut user = LocalIdentity::new(env.realm_id, "jdoe")
        .with_email("jdoe@example.com")
        .with_federation_link(provider.id());
    env.users.create(&user).await?;
    let before = user.clone();

    let input = CredentialInput::from(UserCredential::password("hunter2"));
    let valid = provider.is_valid(env.realm_id, &mut user, &input).await?;

    assert!(!valid);
    assert_eq!(user, before);
    assert!(!env.credentials.has_credentials(env.realm_id, user.id));

    Ok(())
}

#[tokio::test]
async fn test_hung_portal_times_out() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(profile("jdoe", "jdoe@example.com", 0))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&env.portal)
        .await;

    let lookup = env.provider()?;
    let user = tokio::time::timeout(
        Duration::from_secs(10),
        lookup.get_user_by_username(env.realm_id, "jdoe"),
    )
    .await?;

    assert!(user?.is_none());
    assert!(env.users.is_empty());

    Ok(())
}
