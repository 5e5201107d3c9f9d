mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use queue_cell::handlers::QueueCellState;
use queue_cell::*;

use common::test_engine;

fn test_router() -> Router {
    let engine = test_engine();
    let dispatcher = NotificationDispatcher::with_log_transport(engine.clone());
    create_queue_router(Arc::new(QueueCellState::new(engine, dispatcher)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_join_and_list_doctor_queue() {
    let router = test_router();

    let response = send(
        &router,
        "POST",
        "/hospitals/1/doctors/11/tickets",
        Some(json!({ "name": "Amit", "mobile": "9822012345", "age": 34 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ticket"]["token"], "Q-100");
    assert_eq!(body["ticket"]["status"], "waiting");
    assert_eq!(body["ticket"]["mobile"], "9822012345");

    let response = send(&router, "GET", "/hospitals/1/doctors/11/tickets", None).await;
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["current_serving"], Value::Null);
}

#[tokio::test]
async fn test_join_unavailable_doctor_is_conflict() {
    let router = test_router();

    let response = send(
        &router,
        "POST",
        "/hospitals/1/doctors/12/tickets",
        Some(json!({ "name": "Amit" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not accepting patients"));
}

#[tokio::test]
async fn test_join_with_invalid_contact_is_bad_request() {
    let router = test_router();

    let response = send(
        &router,
        "POST",
        "/hospitals/1/doctors/11/tickets",
        Some(json!({ "name": "Amit", "email": "not-an-email" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_next_patient_flow() {
    let router = test_router();

    let response = send(&router, "POST", "/hospitals/1/doctors/11/next", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["called"], false);

    send(&router, "POST", "/hospitals/1/doctors/11/tickets", Some(json!({ "name": "A" }))).await;
    let response = send(&router, "POST", "/hospitals/1/doctors/11/next", None).await;
    let body = body_json(response).await;
    assert_eq!(body["called"], true);
    assert_eq!(body["now_serving"]["token"], "Q-100");
    assert_eq!(body["completed"], Value::Null);

    let response = send(&router, "GET", "/hospitals/1/serving", None).await;
    let body = body_json(response).await;
    assert_eq!(body["current_serving"]["11"], "Q-100");
}

#[tokio::test]
async fn test_prioritize_and_status_endpoints() {
    let router = test_router();
    send(&router, "POST", "/hospitals/1/doctors/11/tickets", Some(json!({ "name": "A" }))).await;
    let response = send(&router, "POST", "/hospitals/1/doctors/11/tickets", Some(json!({ "name": "B" }))).await;
    let ticket_id = body_json(response).await["ticket"]["id"].as_str().unwrap().to_string();

    let response = send(&router, "POST", "/hospitals/1/tokens/Q-101/prioritize", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ticket"]["isEmergency"], true);

    let response = send(
        &router,
        "PUT",
        &format!("/tickets/{}/status", ticket_id),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &router,
        "PUT",
        &format!("/tickets/{}/status", ticket_id),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_alert_and_position_endpoints() {
    let router = test_router();
    send(&router, "POST", "/hospitals/1/doctors/11/tickets", Some(json!({ "name": "A" }))).await;
    let response = send(&router, "POST", "/hospitals/1/doctors/11/tickets", Some(json!({ "name": "B" }))).await;
    let ticket_id = body_json(response).await["ticket"]["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        "POST",
        &format!("/tickets/{}/alert", ticket_id),
        Some(json!({ "channel": "SMS" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ticket"]["alertSent"], "SMS");
    assert_eq!(body["ticket"]["lastMessage"], "Your appointment number is Q-101. Please be ready.");

    let response = send(&router, "GET", &format!("/tickets/{}/position", ticket_id), None).await;
    let body = body_json(response).await;
    assert_eq!(body["peopleAhead"], 1);
    assert_eq!(body["estimatedWaitMinutes"], 15);
}

#[tokio::test]
async fn test_unknown_ticket_is_404() {
    let router = test_router();
    let response = send(
        &router,
        "GET",
        "/tickets/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_endpoints() {
    let router = test_router();

    let response = send(
        &router,
        "POST",
        "/history",
        Some(json!({
            "patientName": "Amit",
            "hospital": "Ruby Hall Clinic",
            "doctor": "Dr. Sunil Joshi",
            "date": "2025-02-10",
            "diagnosis": "Hypertension",
            "prescription": "Amlodipine 5mg"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, "GET", "/history?patientName=amit", None).await;
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["records"][0]["diagnosis"], "Hypertension");
}
