use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use directory_cell::handlers::DirectoryCellState;
use directory_cell::*;

fn test_router() -> axum::Router {
    let directory = Arc::new(HospitalDirectory::from_feed(default_feed()).expect("valid feed"));
    directory_routes(Arc::new(DirectoryCellState::new(directory)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

#[tokio::test]
async fn test_list_hospitals_with_search() {
    let response = test_router()
        .oneshot(Request::get("/?q=erandwane").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_get_unknown_hospital_is_404() {
    let response = test_router()
        .oneshot(Request::get("/42").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_doctor_status_endpoint() {
    let request = Request::put("/1/doctors/101/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "On Break" }).to_string()))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["doctor"]["status"], "OnBreak");
}
