use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use directory_cell::directory_routes;
use directory_cell::handlers::DirectoryCellState;
use queue_cell::create_queue_router;
use queue_cell::handlers::QueueCellState;

pub fn create_router(directory: Arc<DirectoryCellState>, queue: Arc<QueueCellState>) -> Router {
    Router::new()
        .route("/", get(|| async { "MediQueue API is running!" }))
        .nest("/hospitals", directory_routes(directory))
        .nest("/queue", create_queue_router(queue))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use directory_cell::{default_feed, HospitalDirectory, StatusController};
    use queue_cell::{NotificationDispatcher, SchedulingEngine};
    use serde_json::Value;
    use shared_config::AppConfig;
    use tower::ServiceExt;

    fn app() -> Router {
        let directory = Arc::new(HospitalDirectory::from_feed(default_feed()).unwrap());
        let engine = Arc::new(SchedulingEngine::new(
            StatusController::new(directory.clone()),
            &AppConfig::default(),
        ));
        let dispatcher = NotificationDispatcher::with_log_transport(engine.clone());
        create_router(
            Arc::new(DirectoryCellState::new(directory)),
            Arc::new(QueueCellState::new(engine, dispatcher)),
        )
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn root_reports_running() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn doctor_status_change_gates_queue_admission() {
        let router = app();

        let (status, _) = call(
            &router,
            Request::put("/hospitals/1/doctors/101/status")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status":"Unavailable"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &router,
            Request::post("/queue/hospitals/1/doctors/101/tickets")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Amit"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn joins_queue_for_seeded_doctor() {
        let (status, body) = call(
            &app(),
            Request::post("/queue/hospitals/2/doctors/201/tickets")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Priya"}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticket"]["token"], "Q-100");
    }
}
