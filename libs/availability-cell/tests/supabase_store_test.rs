mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::{
    AvailabilityError, AvailabilityStore, SupabaseAvailabilityStore, UpdateWindowRequest, WindowKind,
};
use common::{availability, monday, time};
use shared_database::SupabaseClient;
use shared_utils::test_utils::TestConfig;

fn store_for(server: &MockServer) -> SupabaseAvailabilityStore {
    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    SupabaseAvailabilityStore::with_client(Arc::new(SupabaseClient::new(&config)))
}

fn row(id: Uuid, salon_id: Uuid, staff_id: Uuid, day: i32, start: &str, end: &str, kind: &str) -> serde_json::Value {
    json!({
        "id": id,
        "salon_id": salon_id,
        "staff_id": staff_id,
        "day_of_week": day,
        "start_time": start,
        "end_time": end,
        "kind": kind,
        "specific_date": null,
        "created_at": "2030-01-01T00:00:00Z",
        "updated_at": "2030-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn lists_windows_for_staff() {
    let server = MockServer::start().await;
    let (salon_id, staff_id) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_availabilities"))
        .and(query_param("salon_id", format!("eq.{}", salon_id)))
        .and(query_param("staff_id", format!("eq.{}", staff_id)))
        .and(query_param("order", "day_of_week.asc,start_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(Uuid::new_v4(), salon_id, staff_id, 1, "09:00:00", "17:00:00", "AVAILABILITY"),
            row(Uuid::new_v4(), salon_id, staff_id, 1, "12:00:00", "13:00:00", "TIME_OFF"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let windows = store_for(&server).windows_for_staff(salon_id, staff_id).await.unwrap();

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].start_time, time(9, 0));
    assert_eq!(windows[1].kind, WindowKind::TimeOff);
}

#[tokio::test]
async fn day_query_filters_by_weekday_and_date() {
    let server = MockServer::start().await;
    let (salon_id, staff_id) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_availabilities"))
        .and(query_param("day_of_week", "eq.1"))
        .and(query_param("or", "(specific_date.is.null,specific_date.eq.2030-06-03)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(Uuid::new_v4(), salon_id, staff_id, 1, "09:00:00", "17:00:00", "AVAILABILITY"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let windows = store_for(&server)
        .windows_for_day(salon_id, staff_id, monday())
        .await
        .unwrap();

    assert_eq!(windows.len(), 1);
}

#[tokio::test]
async fn create_posts_validated_window() {
    let server = MockServer::start().await;
    let (salon_id, staff_id) = (Uuid::new_v4(), Uuid::new_v4());
    let created_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_availabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/staff_availabilities"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({
            "day_of_week": 1,
            "start_time": "09:00:00",
            "end_time": "17:00:00",
            "kind": "AVAILABILITY"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            row(created_id, salon_id, staff_id, 1, "09:00:00", "17:00:00", "AVAILABILITY"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let window = store_for(&server)
        .create_window(salon_id, staff_id, availability(1, (9, 0), (17, 0)))
        .await
        .unwrap();

    assert_eq!(window.id, created_id);
}

#[tokio::test]
async fn create_rejects_overlap_before_writing() {
    let server = MockServer::start().await;
    let (salon_id, staff_id) = (Uuid::new_v4(), Uuid::new_v4());
    let existing_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_availabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(existing_id, salon_id, staff_id, 1, "09:00:00", "17:00:00", "AVAILABILITY"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = store_for(&server)
        .create_window(salon_id, staff_id, availability(1, (16, 0), (18, 0)))
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::OverlappingWindow { existing_id: id } if id == existing_id);
}

#[tokio::test]
async fn update_of_unknown_window_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_availabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .update_window(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), UpdateWindowRequest::default())
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::NotFound);
}

#[tokio::test]
async fn delete_with_no_matching_row_is_not_found() {
    let server = MockServer::start().await;
    let window_id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/staff_availabilities"))
        .and(query_param("id", format!("eq.{}", window_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let err = store_for(&server)
        .delete_window(Uuid::new_v4(), Uuid::new_v4(), window_id)
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::NotFound);
}

#[tokio::test]
async fn upstream_failure_is_storage_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .windows_for_staff(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::Storage(_));
}
