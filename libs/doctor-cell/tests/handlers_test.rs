use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::router::doctor_routes;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn create_test_app(mock_server: &MockServer) -> Router {
    doctor_routes(TestConfig::with_url(mock_server.uri()).to_state())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

#[tokio::test]
async fn test_create_doctor_success() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .and(body_partial_json(json!({ "nik": "1234567890", "name": "dr. Sari" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::doctor_response(&doctor_id, "1234567890", "dr. Sari", "Cardiology")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        create_test_app(&mock_server),
        "POST",
        "/",
        Some(json!({ "nik": "1234567890", "name": "  dr. Sari ", "specialty": "Cardiology" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], doctor_id);
    assert_eq!(body["specialty"], "Cardiology");
}

#[tokio::test]
async fn test_create_doctor_rejects_short_nik_without_touching_store() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        create_test_app(&mock_server),
        "POST",
        "/",
        Some(json!({ "nik": "123", "name": "dr. Sari", "specialty": "Cardiology" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("NIK"));
}

#[tokio::test]
async fn test_create_doctor_duplicate_nik_is_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("23505", "duplicate key value violates unique constraint \"doctors_nik_key\""),
        ))
        .mount(&mock_server)
        .await;

    let (status, _) = send(
        create_test_app(&mock_server),
        "POST",
        "/",
        Some(json!({ "nik": "1234567890", "name": "dr. Sari", "specialty": "Cardiology" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let mock_server = MockServer::start().await;

    let (status, body) = send(
        create_test_app(&mock_server),
        "POST",
        "/",
        Some(json!({ "nik": 1234567890 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_doctors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(&Uuid::new_v4().to_string(), "1234567890", "dr. Andi", "Neurology"),
            MockSupabaseResponses::doctor_response(&Uuid::new_v4().to_string(), "0987654321", "dr. Sari", "Cardiology"),
        ])))
        .mount(&mock_server)
        .await;

    let (status, body) = send(create_test_app(&mock_server), "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["doctors"][0]["name"], "dr. Andi");
}

#[tokio::test]
async fn test_get_unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let (status, _) = send(create_test_app(&mock_server), "GET", &format!("/{}", doctor_id), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_doctor_with_invalid_id_is_bad_request() {
    let mock_server = MockServer::start().await;

    let (status, _) = send(create_test_app(&mock_server), "GET", "/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_working_hours_success() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_schedules"))
        .and(body_partial_json(json!({
            "doctor_id": doctor_id,
            "day_of_week": 1,
            "start_time": "09:00:00",
            "end_time": "17:00:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::schedule_response(&doctor_id, 1, "09:00:00", "17:00:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        create_test_app(&mock_server),
        "POST",
        &format!("/{}/schedules", doctor_id),
        Some(json!({ "dayOfWeek": 1, "startTime": "09:00:00", "endTime": "17:00:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["day_of_week"], 1);
    assert_eq!(body["start_time"], "09:00:00");
}

#[tokio::test]
async fn test_add_working_hours_rejects_inverted_window() {
    let mock_server = MockServer::start().await;

    let (status, _) = send(
        create_test_app(&mock_server),
        "POST",
        &format!("/{}/schedules", Uuid::new_v4()),
        Some(json!({ "dayOfWeek": 2, "startTime": "17:00:00", "endTime": "09:00:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_working_hours_rejects_day_out_of_range() {
    let mock_server = MockServer::start().await;

    let (status, _) = send(
        create_test_app(&mock_server),
        "POST",
        &format!("/{}/schedules", Uuid::new_v4()),
        Some(json!({ "dayOfWeek": 8, "startTime": "09:00:00", "endTime": "17:00:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_second_window_for_same_day_is_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_schedules"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("23505", "duplicate key value violates unique constraint"),
        ))
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        create_test_app(&mock_server),
        "POST",
        &format!("/{}/schedules", Uuid::new_v4()),
        Some(json!({ "dayOfWeek": 1, "startTime": "08:00:00", "endTime": "12:00:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A schedule for this day already exists");
}

#[tokio::test]
async fn test_schedule_for_unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_schedules"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("23503", "insert or update violates foreign key constraint"),
        ))
        .mount(&mock_server)
        .await;

    let (status, _) = send(
        create_test_app(&mock_server),
        "POST",
        &format!("/{}/schedules", Uuid::new_v4()),
        Some(json!({ "dayOfWeek": 1, "startTime": "08:00:00", "endTime": "12:00:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_time_off_blank_reason_is_stored_as_null() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_time_off"))
        .and(body_partial_json(json!({ "off_date": "2024-06-03", "reason": null })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::time_off_response(&doctor_id, "2024-06-03", None)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        create_test_app(&mock_server),
        "POST",
        &format!("/{}/timeoff", doctor_id),
        Some(json!({ "offDate": "2024-06-03", "reason": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["off_date"], "2024-06-03");
    assert!(body["reason"].is_null());
}

#[tokio::test]
async fn test_duplicate_time_off_is_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_time_off"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("23505", "duplicate key value violates unique constraint"),
        ))
        .mount(&mock_server)
        .await;

    let (status, _) = send(
        create_test_app(&mock_server),
        "POST",
        &format!("/{}/timeoff", Uuid::new_v4()),
        Some(json!({ "off_date": "2024-06-03", "reason": "Conference" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_schedules_and_time_off() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_schedules"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::schedule_response(&doctor_id, 1, "09:00:00", "17:00:00"),
            MockSupabaseResponses::schedule_response(&doctor_id, 3, "13:00:00", "18:00:00"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_time_off"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::time_off_response(&doctor_id, "2024-06-03", Some("Conference")),
        ])))
        .mount(&mock_server)
        .await;

    let (status, schedules) = send(
        create_test_app(&mock_server),
        "GET",
        &format!("/{}/schedules", doctor_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schedules["total"], 2);
    assert_eq!(schedules["schedules"][1]["day_of_week"], 3);

    let (status, time_off) = send(
        create_test_app(&mock_server),
        "GET",
        &format!("/{}/timeoff", doctor_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(time_off["time_off"][0]["reason"], "Conference");
}
