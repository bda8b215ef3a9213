//! End-to-end flows of the API client against an in-process backend.

mod common;

use std::sync::{Arc, Mutex};

use appliance_client::{ApiClient, AuthEvents, ClientError, ConsoleConfig, MemoryToken, NoOpEvents};
use appliance_core::{LoginRequest, ManufacturerRequest, OrderRequest, OrderRowRequest, PageRequest, UserRole};
use common::{spawn_backend, REVOKED_TOKEN, VALID_TOKEN};

#[derive(Default)]
struct RecordingEvents {
    statuses: Mutex<Vec<u16>>,
}

impl AuthEvents for RecordingEvents {
    fn on_auth_failure(&self, status: u16) {
        self.statuses.lock().unwrap().push(status);
    }
}

fn client(base_url: &str, token: Option<&str>) -> ApiClient {
    let config = ConsoleConfig::with_base_url(base_url);
    ApiClient::new(
        &config,
        Arc::new(MemoryToken::new(token.map(str::to_string))),
        Arc::new(NoOpEvents),
    )
    .unwrap()
}

#[tokio::test]
async fn test_login_returns_session_payload() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, None);

    let session = api
        .login(&LoginRequest {
            email: "ann@shop.com".into(),
            password: "Secret1!".into(),
        })
        .await
        .unwrap();

    assert_eq!(session.token, VALID_TOKEN);
    assert_eq!(session.user_id, 7);
    assert_eq!(session.role.parse::<UserRole>().unwrap(), UserRole::Employee);
    assert_eq!(backend.last_authorization(), None);
}

#[tokio::test]
async fn test_bad_credentials_surface_backend_message() {
    let (base_url, _backend) = spawn_backend().await;
    let api = client(&base_url, None);

    let err = api
        .login(&LoginRequest {
            email: "ann@shop.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(err.user_message(), "Bad credentials");
}

#[tokio::test]
async fn test_repeated_reads_are_served_from_cache() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));
    let page = PageRequest::new(0, 10);

    let first = api.list_appliances(&page).await.unwrap();
    let second = api.list_appliances(&page).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.content.len(), 2);
    assert_eq!(first.content[0].manufacturer_name(), "Bosch");
    assert_eq!(backend.hits("GET /appliances"), 1);
}

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));
    let page = PageRequest::new(0, 10);

    let (a, b) = tokio::join!(api.list_appliances(&page), api.list_appliances(&page));

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(backend.hits("GET /appliances"), 1);
}

#[tokio::test]
async fn test_different_params_are_separate_entries() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));

    api.list_appliances(&PageRequest::new(0, 10)).await.unwrap();
    api.list_appliances(&PageRequest::new(1, 10)).await.unwrap();

    assert_eq!(backend.hits("GET /appliances"), 2);
}

#[tokio::test]
async fn test_creating_an_order_refreshes_order_lists() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));
    let page = PageRequest::new(0, 10);

    let before = api.list_orders(&page).await.unwrap();
    assert!(before.content.is_empty());

    let created = api
        .create_order(&OrderRequest {
            client_id: 3,
            order_rows: vec![OrderRowRequest {
                appliance_id: 1,
                quantity: 2,
                amount: None,
            }],
        })
        .await
        .unwrap();
    assert_eq!(created.client_id(), Some(3));

    let after = api.list_orders(&page).await.unwrap();
    assert_eq!(after.content.len(), 1);
    assert_eq!(backend.hits("GET /orders"), 2);
}

#[tokio::test]
async fn test_approving_an_order_invalidates_the_order_row() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));
    let page = PageRequest::new(0, 10);

    api.create_order(&OrderRequest {
        client_id: 3,
        order_rows: vec![],
    })
    .await
    .unwrap();
    let listed = api.list_orders(&page).await.unwrap();
    assert!(!listed.content[0].approved);

    let approved = api.approve_order(listed.content[0].id).await.unwrap();
    assert!(approved.approved);

    let refreshed = api.list_orders(&page).await.unwrap();
    assert!(refreshed.content[0].approved);
    assert_eq!(backend.hits("GET /orders"), 2);
}

#[tokio::test]
async fn test_unrelated_mutation_keeps_other_caches() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));
    let page = PageRequest::new(0, 10);

    api.list_appliances(&page).await.unwrap();
    api.create_order(&OrderRequest {
        client_id: 3,
        order_rows: vec![],
    })
    .await
    .unwrap();
    api.list_appliances(&page).await.unwrap();

    assert_eq!(backend.hits("GET /appliances"), 1);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));

    let profile = api.get_profile().await.unwrap();

    assert_eq!(profile.role(), UserRole::Employee);
    assert_eq!(
        backend.last_authorization(),
        Some(format!("Bearer {}", VALID_TOKEN))
    );
}

#[tokio::test]
async fn test_rejected_session_notifies_auth_events() {
    let (base_url, _backend) = spawn_backend().await;
    let events = Arc::new(RecordingEvents::default());
    let config = ConsoleConfig::with_base_url(&base_url);
    let api = ApiClient::new(
        &config,
        Arc::new(MemoryToken::new(Some(REVOKED_TOKEN.to_string()))),
        events.clone(),
    )
    .unwrap();

    let err = api.get_profile().await.unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(err.user_message(), "Token expired");
    assert_eq!(*events.statuses.lock().unwrap(), vec![401]);
}

#[tokio::test]
async fn test_validation_errors_map_to_fields() {
    let (base_url, backend) = spawn_backend().await;
    let api = client(&base_url, Some(VALID_TOKEN));
    let page = PageRequest::new(0, 10);
    api.list_manufacturers(&page).await.unwrap();

    let err = api
        .create_manufacturer(&ManufacturerRequest {
            name: String::new(),
            address: "Main St".into(),
            country: "DE".into(),
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    let fields = err.field_errors().unwrap();
    assert_eq!(fields.get("name").map(String::as_str), Some("must not be blank"));

    // A failed mutation leaves the cache alone.
    api.list_manufacturers(&page).await.unwrap();
    assert_eq!(backend.hits("GET /manufacturers"), 1);
}

#[tokio::test]
async fn test_server_errors_are_retried_when_enabled() {
    let (base_url, backend) = spawn_backend().await;
    backend.fail_manufacturers(2);

    let mut config = ConsoleConfig::with_base_url(&base_url);
    config.retry.max_retries = 3;
    config.retry.initial_backoff_ms = 10;
    let api = ApiClient::new(&config, Arc::new(MemoryToken::new(None)), Arc::new(NoOpEvents)).unwrap();

    let page = api.list_manufacturers(&PageRequest::new(0, 10)).await.unwrap();

    assert_eq!(page.content.len(), 1);
    assert_eq!(backend.hits("GET /manufacturers"), 3);
}

#[tokio::test]
async fn test_server_errors_fail_fast_without_retry() {
    let (base_url, backend) = spawn_backend().await;
    backend.fail_manufacturers(1);
    let api = client(&base_url, None);

    let err = api
        .list_manufacturers(&PageRequest::new(0, 10))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.user_message(), "Service unavailable. Please try again later.");
    assert_eq!(backend.hits("GET /manufacturers"), 1);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let api = client("http://127.0.0.1:9/api", None);

    let err = api
        .list_appliances(&PageRequest::new(0, 10))
        .await
        .unwrap_err();

    assert!(err.is_network_error());
    assert_eq!(
        err.user_message(),
        "Network error. Please check your internet connection."
    );
}
