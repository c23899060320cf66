//! Wire-level checks of `HttpTransport` against a local mock registry.

use apic_discovery::archive::ARCHIVE_FILE_NAME;
use apic_discovery::auth::{acquire_token, DEFAULT_REALM};
use apic_discovery::endpoints::DiscoveryEndpoints;
use apic_discovery::submit::create_or_update_discovered_api_at;
use apic_discovery::transport::HttpTransport;
use apic_discovery::DiscoveryConfig;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFLICT_ID: &str = "abcdefab-1234-5678-9abc-def012345678";

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/discovery/token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "grant_type": "api_key",
            "api_key": "secret-key",
            "realm": DEFAULT_REALM,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "bearer-123"})))
        .expect(1)
        .mount(server)
        .await;
}

fn endpoints(server: &MockServer) -> DiscoveryEndpoints {
    DiscoveryEndpoints::with_base(format!("{}/discovery", server.uri()))
}

fn config(workspace: &std::path::Path, location: &str, is_folder: bool) -> DiscoveryConfig {
    let mut config = DiscoveryConfig::new("unused.example.com", "porg");
    config.api_key = Some("secret-key".to_string());
    config.apis_location = Some(location.to_string());
    config.is_folder = is_folder;
    config.data_source_location = "github.com/acme/apis".to_string();
    config.workspace = workspace.to_path_buf();
    config
}

#[tokio::test]
async fn token_exchange_sends_api_key_grant() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let transport = HttpTransport::new(false).expect("client");
    let token = acquire_token(&transport, &endpoints(&server), "secret-key", DEFAULT_REALM)
        .await
        .expect("token");
    assert_eq!(token, "bearer-123");
}

#[tokio::test]
async fn single_document_create_carries_record_headers() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/discovery/orgs/porg/discovered-apis"))
        .and(header("authorization", "Bearer bearer-123"))
        .and(header("x-ibm-record-api-version", "1.0"))
        .and(header("content-type", "application/yaml"))
        .and(body_string_contains(r#""original_format":"yaml""#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("orders.yaml"), "openapi: 3.0.0\npaths: {}\n").unwrap();

    let transport = HttpTransport::new(false).unwrap();
    let result = create_or_update_discovered_api_at(
        &transport,
        &endpoints(&server),
        &config(dir.path(), "orders.yaml", false),
    )
    .await
    .unwrap();
    assert_eq!(result.status, 201);
}

#[tokio::test]
async fn conflict_leads_to_patch_of_existing_record() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/discovery/orgs/porg/discovered-apis"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": 409,
            "message": [format!("Discovered API {CONFLICT_ID} already exists")],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/discovery/orgs/porg/discovered-apis/{CONFLICT_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), r#"{"openapi":"3.0.0"}"#).unwrap();

    let transport = HttpTransport::new(false).unwrap();
    let result = create_or_update_discovered_api_at(
        &transport,
        &endpoints(&server),
        &config(dir.path(), "a.json", false),
    )
    .await
    .unwrap();
    assert_eq!(result.status, 200);
}

#[tokio::test]
async fn folder_upload_is_multipart_zip() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/discovery/orgs/porg/discovered-apis/bulk"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let folder = dir.path().join("APIfolder");
    std::fs::create_dir(&folder).unwrap();
    std::fs::write(folder.join("one.json"), r#"{"openapi":"3.0.0"}"#).unwrap();
    std::fs::write(folder.join("two.yml"), "openapi: 3.0.0\n").unwrap();

    let transport = HttpTransport::new(false).unwrap();
    let result = create_or_update_discovered_api_at(
        &transport,
        &endpoints(&server),
        &config(dir.path(), "APIfolder", true),
    )
    .await
    .unwrap();

    assert_eq!(result.status, 201);
    assert!(!dir.path().join(ARCHIVE_FILE_NAME).exists());
}

#[tokio::test]
async fn server_error_marks_data_source_unhealthy() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/discovery/orgs/porg/discovered-apis"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": ["invalid document"]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/discovery/orgs/porg/data-sources/github.com-acme-apis"))
        .and(body_json(json!({"state": "unhealthy", "message": "invalid document"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), r#"{"openapi":"3.0.0"}"#).unwrap();

    let transport = HttpTransport::new(false).unwrap();
    let result = create_or_update_discovered_api_at(
        &transport,
        &endpoints(&server),
        &config(dir.path(), "a.json", false),
    )
    .await
    .unwrap();
    assert_eq!(result.status, 422);
    assert_eq!(result.first_message(), "invalid document");
}
