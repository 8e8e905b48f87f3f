//! Password migration on first successful login.

use pf_federation::{CredentialInputValidator, UserLookupProvider};
use pf_model::{CredentialInput, CredentialType, UserCredential};
use pf_storage::UserStore;

use crate::common::{TestEnv, profile};

fn password(value: &str) -> CredentialInput {
    UserCredential::password(value).into()
}

#[tokio::test]
async fn test_valid_password_migrates_identity() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "jdoe@example.com", 0), 1)
        .await;
    env.serve_validation("jdoe@example.com", "hunter2", true, 1)
        .await;

    let provider = env.provider()?;
    let mut user = provider
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be imported");
    assert!(provider.is_configured_for(env.realm_id, &user, CredentialType::Password));

    let valid = provider
        .is_valid(env.realm_id, &mut user, &password("hunter2"))
        .await?;

    assert!(valid);
    assert!(!user.is_federated());
    assert!(env.credentials.verify_password(env.realm_id, user.id, "hunter2"));
    assert!(!env.credentials.verify_password(env.realm_id, user.id, "wrong"));

    let stored = env
        .users
        .get_by_id(env.realm_id, user.id)
        .await?
        .expect("user should be stored");
    assert!(!stored.is_federated());

    // The next login is handled locally
    let next = env.provider()?;
    let user = next
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be stored");
    assert!(!next.is_configured_for(env.realm_id, &user, CredentialType::Password));

    Ok(())
}

#[tokio::test]
async fn test_wrong_password_changes_nothing() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "jdoe@example.com", 0), 1)
        .await;
    env.serve_validation("jdoe@example.com", "nope", false, 1)
        .await;

    let provider = env.provider()?;
    let mut user = provider
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be imported");
    let before = user.clone();

    let valid = provider
        .is_valid(env.realm_id, &mut user, &password("nope"))
        .await?;

    assert!(!valid);
    assert_eq!(user, before);
    assert!(!env.credentials.has_credentials(env.realm_id, user.id));

    Ok(())
}

#[tokio::test]
async fn test_portal_error_on_validation_changes_nothing() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "jdoe@example.com", 0), 1)
        .await;
    env.fail_validation(500, "Internal Server Error").await;

    let provider = env.provider()?;
    let mut user = provider
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be imported");

    let valid = provider
        .is_valid(env.realm_id, &mut user, &password("hunter2"))
        .await?;

    assert!(!valid);
    assert!(user.is_linked_to(env.config.id));
    assert!(!env.credentials.has_credentials(env.realm_id, user.id));

    let stored = env
        .users
        .get_by_id(env.realm_id, user.id)
        .await?
        .expect("user should be stored");
    assert!(stored.is_linked_to(env.config.id));

    Ok(())
}

#[tokio::test]
async fn test_otp_is_not_handled() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "jdoe@example.com", 0), 1)
        .await;
    env.serve_validation("jdoe@example.com", "123456", true, 0)
        .await;

    let provider = env.provider()?;
    let mut user = provider
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be imported");
    let otp = CredentialInput::from(UserCredential::new(CredentialType::Otp, "123456"));

    assert!(!provider.supports_credential_type(CredentialType::Otp));
    assert!(!provider.is_valid(env.realm_id, &mut user, &otp).await?);

    Ok(())
}
