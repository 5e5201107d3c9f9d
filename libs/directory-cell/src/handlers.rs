use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use shared_models::error::AppError;

use crate::models::{DoctorId, HospitalId, HospitalSearchQuery, UpdateDoctorStatusRequest};
use crate::services::{HospitalDirectory, StatusController};

pub struct DirectoryCellState {
    pub directory: Arc<HospitalDirectory>,
    pub status_controller: StatusController,
}

impl DirectoryCellState {
    pub fn new(directory: Arc<HospitalDirectory>) -> Self {
        let status_controller = StatusController::new(Arc::clone(&directory));
        Self {
            directory,
            status_controller,
        }
    }
}

/// List hospitals, optionally filtered by `?q=`
pub async fn list_hospitals(
    State(state): State<Arc<DirectoryCellState>>,
    Query(query): Query<HospitalSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let hospitals = match query.q.as_deref() {
        Some(q) => state.directory.search(q).await,
        None => state.directory.list_hospitals().await,
    };

    Ok(Json(json!({
        "hospitals": hospitals,
        "total": hospitals.len()
    })))
}

pub async fn get_hospital(
    State(state): State<Arc<DirectoryCellState>>,
    Path(hospital_id): Path<HospitalId>,
) -> Result<Json<Value>, AppError> {
    let hospital = state.directory.get_hospital(hospital_id).await?;
    Ok(Json(json!(hospital)))
}

/// Toggle a doctor's availability
pub async fn update_doctor_status(
    State(state): State<Arc<DirectoryCellState>>,
    Path((hospital_id, doctor_id)): Path<(HospitalId, DoctorId)>,
    Json(request): Json<UpdateDoctorStatusRequest>,
) -> Result<Json<Value>, AppError> {
    info!("Status update for doctor {} in hospital {}: {}", doctor_id, hospital_id, request.status);

    let doctor = state
        .status_controller
        .update_doctor_status(hospital_id, doctor_id, request.status)
        .await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor
    })))
}
