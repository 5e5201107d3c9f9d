use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};

use crate::handlers::{self, DirectoryCellState};

pub fn directory_routes(state: Arc<DirectoryCellState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_hospitals))
        .route("/{hospital_id}", get(handlers::get_hospital))
        .route("/{hospital_id}/doctors/{doctor_id}/status", put(handlers::update_doctor_status))
        .with_state(state)
}
