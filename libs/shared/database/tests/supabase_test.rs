use assert_matches::assert_matches;
use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::{SupabaseClient, SupabaseError};

fn client_for(server: &MockServer) -> SupabaseClient {
    let config = AppConfig {
        supabase_url: server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "secret".to_string(),
        ..AppConfig::default()
    };
    SupabaseClient::new(&config)
}

#[tokio::test]
async fn sends_api_key_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("staff_id", "eq.abc"))
        .and(header("apikey", "test-anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rows: Vec<Value> = client
        .request(Method::GET, "/rest/v1/bookings?staff_id=eq.abc", Some("user-token"), None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn falls_back_to_anon_key_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_availabilities"))
        .and(header("authorization", "Bearer test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rows: Vec<Value> = client
        .request(Method::GET, "/rest/v1/staff_availabilities", None, None)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn maps_conflict_status_to_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(409).set_body_string("exclusion violation"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .request::<Vec<Value>>(Method::POST, "/rest/v1/bookings", None, Some(json!({})))
        .await
        .unwrap_err();

    assert_matches!(err.downcast_ref::<SupabaseError>(), Some(SupabaseError::Conflict(_)));
}

#[tokio::test]
async fn maps_server_error_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .request::<Vec<Value>>(Method::GET, "/rest/v1/bookings", None, None)
        .await
        .unwrap_err();

    assert_matches!(
        err.downcast_ref::<SupabaseError>(),
        Some(SupabaseError::Api { status: 500, .. })
    );
}
