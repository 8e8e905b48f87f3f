//! On-demand import of Portal users into the local store.

use pf_federation::{StorageId, UserLookupProvider, UserStorageProvider};
use pf_model::LocalIdentity;
use pf_storage::UserStore;

use crate::common::{TestEnv, profile};

#[tokio::test]
async fn test_unknown_user_is_imported_once() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "jdoe@example.com", 0), 1)
        .await;

    let provider = env.provider()?;
    let first = provider
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be imported");
    let again = provider
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be cached");

    assert_eq!(first, again);
    assert_eq!(first.username, "jdoe");
    assert_eq!(first.email.as_deref(), Some("jdoe@example.com"));
    assert_eq!(first.first_name.as_deref(), Some("John"));
    assert_eq!(first.last_name.as_deref(), Some("Doe"));
    assert!(first.enabled);
    assert!(first.is_linked_to(env.config.id));

    // A later unit of work is answered by the local store
    let next = env.provider()?;
    let stored = next
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be stored");
    assert_eq!(stored.id, first.id);
    assert_eq!(env.users.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_inactive_portal_user_is_disabled() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("asmith", profile("asmith", "asmith@example.com", 5), 1)
        .await;

    let user = env
        .provider()?
        .get_user_by_username(env.realm_id, "asmith")
        .await?
        .expect("user should be imported");

    assert!(!user.enabled);
    assert!(user.is_federated());

    Ok(())
}

#[tokio::test]
async fn test_lookup_by_email() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_email("j+doe@example.com", profile("jdoe", "j+doe@example.com", 0), 1)
        .await;

    let provider = env.provider()?;
    let user = provider
        .get_user_by_email(env.realm_id, "j+doe@example.com")
        .await?
        .expect("user should be imported");
    assert_eq!(user.username, "jdoe");

    // Same record through the username index, without another Portal call
    let by_username = provider
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("user should be stored");
    assert_eq!(by_username.id, user.id);

    Ok(())
}

#[tokio::test]
async fn test_local_user_never_reaches_portal() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "portal@example.com", 0), 0)
        .await;

    let local = LocalIdentity::new(env.realm_id, "jdoe").with_email("local@example.com");
    env.users.create(&local).await?;

    let user = env
        .provider()?
        .get_user_by_username(env.realm_id, "jdoe")
        .await?
        .expect("local user should resolve");

    assert_eq!(user, local);
    assert!(!user.is_federated());

    Ok(())
}

#[tokio::test]
async fn test_lookup_by_storage_id() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "jdoe@example.com", 0), 1)
        .await;

    let provider = env.provider()?;
    let own = StorageId::federated(env.config.id.to_string(), "jdoe").to_string();
    let foreign = StorageId::federated(uuid::Uuid::now_v7().to_string(), "jdoe").to_string();

    assert!(provider.get_user_by_id(env.realm_id, &foreign).await?.is_none());
    let user = provider
        .get_user_by_id(env.realm_id, &own)
        .await?
        .expect("user should be imported");
    assert_eq!(user.username, "jdoe");

    Ok(())
}

#[tokio::test]
async fn test_concurrent_units_of_work_share_one_record() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.serve_by_screen_name("jdoe", profile("jdoe", "jdoe@example.com", 0), 1..=2)
        .await;

    let first = env.provider()?;
    let second = env.provider()?;
    let (a, b) = tokio::join!(
        first.get_user_by_username(env.realm_id, "jdoe"),
        second.get_user_by_username(env.realm_id, "jdoe"),
    );

    let a = a?.expect("first unit of work should resolve");
    let b = b?.expect("second unit of work should resolve");
    assert_eq!(a.id, b.id);
    assert_eq!(env.users.len(), 1);

    first.close().await?;
    second.close().await?;
    Ok(())
}
