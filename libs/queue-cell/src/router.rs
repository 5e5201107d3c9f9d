use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers::{self, QueueCellState};

pub fn create_queue_router(state: Arc<QueueCellState>) -> Router {
    let doctor_routes = Router::new()
        .route(
            "/hospitals/{hospital_id}/doctors/{doctor_id}/tickets",
            post(handlers::join_queue).get(handlers::get_doctor_queue),
        )
        .route("/hospitals/{hospital_id}/doctors/{doctor_id}/next", post(handlers::next_patient))
        .route("/hospitals/{hospital_id}/serving", get(handlers::get_current_serving))
        .route("/hospitals/{hospital_id}/tokens/{token}/prioritize", post(handlers::prioritize_patient));

    let patient_routes = Router::new()
        .route("/tickets/{ticket_id}", get(handlers::get_ticket))
        .route("/tickets/{ticket_id}/status", put(handlers::update_patient_status))
        .route("/tickets/{ticket_id}/alert", post(handlers::send_alert))
        .route("/tickets/{ticket_id}/complete", post(handlers::complete_patient))
        .route("/tickets/{ticket_id}/position", get(handlers::get_ticket_position));

    let record_routes = Router::new()
        .route("/history", get(handlers::list_history).post(handlers::add_report))
        .route("/snapshot", get(handlers::get_snapshot));

    Router::new()
        .merge(doctor_routes)
        .merge(patient_routes)
        .merge(record_routes)
        .with_state(state)
}
