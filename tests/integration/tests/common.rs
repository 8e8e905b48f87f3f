//! Common test utilities and fixtures.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use pf_federation::{FederationConfig, FederationSession, UserStorageProviderFactory};
use pf_federation_portal::config::{
    AUTH_PRINCIPAL_KEY, AUTH_SECRET_KEY, BASE_URL_KEY, COMPANY_ID_KEY,
};
use pf_federation_portal::{PortalProviderFactory, PortalUserFederationProvider};
use pf_storage::memory::{InMemoryCredentialStore, InMemoryUserStore};
use serde_json::{Value, json};
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

/// Company id every mocked lookup expects.
pub const COMPANY_ID: &str = "20116";

/// Basic auth header for `svc:s3cr3t`.
pub const AUTHORIZATION: &str = "Basic c3ZjOnMzY3IzdA==";

const SCREEN_NAME_PATH: &str = "/api/jsonws/user/get-user-by-screen-name";
const EMAIL_ADDRESS_PATH: &str = "/api/jsonws/user/get-user-by-email-address";
const VALIDATE_PATH: &str = "/o/validateUserCredentials";

/// Mock Portal plus the host's local stores.
pub struct TestEnv {
    /// Mock Portal.
    pub portal: MockServer,
    /// Realm under test.
    pub realm_id: Uuid,
    /// Provider configuration as the host stores it.
    pub config: FederationConfig,
    /// Local user store.
    pub users: Arc<InMemoryUserStore>,
    /// Local credential store.
    pub credentials: Arc<InMemoryCredentialStore>,
}

impl TestEnv {
    /// Starts a mock Portal and empty local stores.
    pub async fn new() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("pf_federation_portal=debug")
            .with_test_writer()
            .try_init();

        let portal = MockServer::start().await;
        let realm_id = Uuid::now_v7();
        let config = portal_config(realm_id, &portal.uri())?;

        Ok(Self {
            portal,
            realm_id,
            config,
            users: Arc::new(InMemoryUserStore::new()),
            credentials: Arc::new(InMemoryCredentialStore::new()),
        })
    }

    /// Creates a provider for a new unit of work.
    pub fn provider(&self) -> anyhow::Result<PortalUserFederationProvider> {
        let session = FederationSession::new(self.users.clone(), self.credentials.clone());
        Ok(PortalProviderFactory::new().create(&self.config, session)?)
    }

    /// Serves `profile` for a screen name lookup, expecting `calls` requests.
    pub async fn serve_by_screen_name(
        &self,
        screen_name: &str,
        profile: Value,
        calls: impl Into<Times>,
    ) {
        Mock::given(method("GET"))
            .and(path(SCREEN_NAME_PATH))
            .and(query_param("companyId", COMPANY_ID))
            .and(query_param("screenName", screen_name))
            .and(header("authorization", AUTHORIZATION))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .expect(calls)
            .mount(&self.portal)
            .await;
    }

    /// Serves `profile` for an email lookup, expecting `calls` requests.
    pub async fn serve_by_email(&self, email: &str, profile: Value, calls: impl Into<Times>) {
        Mock::given(method("GET"))
            .and(path(EMAIL_ADDRESS_PATH))
            .and(query_param("companyId", COMPANY_ID))
            .and(query_param("emailAddress", email))
            .and(header("authorization", AUTHORIZATION))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .expect(calls)
            .mount(&self.portal)
            .await;
    }

    /// Answers every lookup with `status` and `body`.
    pub async fn fail_lookups(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.portal)
            .await;
    }

    /// Answers credential checks for `email`/`password` with `valid`.
    pub async fn serve_validation(
        &self,
        email: &str,
        password: &str,
        valid: bool,
        calls: impl Into<Times>,
    ) {
        Mock::given(method("POST"))
            .and(path(VALIDATE_PATH))
            .and(header("authorization", AUTHORIZATION))
            .and(body_json(json!({ "email": email, "password": password })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": valid })))
            .expect(calls)
            .mount(&self.portal)
            .await;
    }

    /// Answers every credential check with `status` and `body`.
    pub async fn fail_validation(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(VALIDATE_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.portal)
            .await;
    }
}

/// Provider configuration pointing at `base_url`.
pub fn portal_config(realm_id: Uuid, base_url: &str) -> anyhow::Result<FederationConfig> {
    Ok(FederationConfig::builder()
        .realm_id(realm_id)
        .provider_type("portal")
        .name("Portal")
        .config(BASE_URL_KEY, base_url)
        .config(COMPANY_ID_KEY, COMPANY_ID)
        .config(AUTH_PRINCIPAL_KEY, "svc")
        .config(AUTH_SECRET_KEY, "s3cr3t")
        .connection_timeout(Duration::from_secs(1))
        .read_timeout(Duration::from_secs(2))
        .build()?)
}

/// Portal JSON for a user.
pub fn profile(screen_name: &str, email: &str, status: i32) -> Value {
    json!({
        "companyId": COMPANY_ID,
        "emailAddress": email,
        "screenName": screen_name,
        "firstName": "John",
        "lastName": "Doe",
        "status": status,
    })
}
