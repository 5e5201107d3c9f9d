use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use directory_cell::{DoctorId, HospitalId};
use shared_models::error::AppError;

use crate::models::{
    HistoryQuery, NewReport, PatientDetails, SendAlertRequest, TicketId,
    UpdatePatientStatusRequest,
};
use crate::services::{NotificationDispatcher, PatientHistoryLog, SchedulingEngine};

pub struct QueueCellState {
    pub engine: Arc<SchedulingEngine>,
    pub dispatcher: NotificationDispatcher,
    pub history: Arc<PatientHistoryLog>,
}

impl QueueCellState {
    pub fn new(engine: Arc<SchedulingEngine>, dispatcher: NotificationDispatcher) -> Self {
        Self {
            engine,
            dispatcher,
            history: Arc::new(PatientHistoryLog::new()),
        }
    }
}

/// Issue a token for a patient
pub async fn join_queue(
    State(state): State<Arc<QueueCellState>>,
    Path((hospital_id, doctor_id)): Path<(HospitalId, DoctorId)>,
    Json(details): Json<PatientDetails>,
) -> Result<Json<Value>, AppError> {
    let ticket = state.engine.join_queue(details, hospital_id, doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "ticket": ticket
    })))
}

pub async fn get_doctor_queue(
    State(state): State<Arc<QueueCellState>>,
    Path((hospital_id, doctor_id)): Path<(HospitalId, DoctorId)>,
) -> Result<Json<Value>, AppError> {
    let tickets = state.engine.doctor_queue(hospital_id, doctor_id).await?;
    let serving = state.engine.serving_for_doctor(hospital_id, doctor_id).await?;

    Ok(Json(json!({
        "hospital_id": hospital_id,
        "doctor_id": doctor_id,
        "current_serving": serving,
        "tickets": tickets,
        "total": tickets.len()
    })))
}

/// Doctor calls the next patient
pub async fn next_patient(
    State(state): State<Arc<QueueCellState>>,
    Path((hospital_id, doctor_id)): Path<(HospitalId, DoctorId)>,
) -> Result<Json<Value>, AppError> {
    info!("Next patient requested by doctor {} in hospital {}", doctor_id, hospital_id);

    match state.engine.next_patient(hospital_id, doctor_id).await? {
        Some(outcome) => Ok(Json(json!({
            "called": true,
            "now_serving": outcome.now_serving,
            "completed": outcome.completed
        }))),
        None => Ok(Json(json!({
            "called": false,
            "message": "No patients waiting"
        }))),
    }
}

pub async fn get_current_serving(
    State(state): State<Arc<QueueCellState>>,
    Path(hospital_id): Path<HospitalId>,
) -> Result<Json<Value>, AppError> {
    let serving = state.engine.current_serving(hospital_id).await?;

    Ok(Json(json!({
        "hospital_id": hospital_id,
        "current_serving": serving
    })))
}

/// Promote a waiting ticket as an emergency
pub async fn prioritize_patient(
    State(state): State<Arc<QueueCellState>>,
    Path((hospital_id, token)): Path<(HospitalId, String)>,
) -> Result<Json<Value>, AppError> {
    let ticket = state.engine.prioritize_patient(hospital_id, &token).await?;

    Ok(Json(json!({
        "success": true,
        "ticket": ticket
    })))
}

pub async fn get_ticket(
    State(state): State<Arc<QueueCellState>>,
    Path(ticket_id): Path<TicketId>,
) -> Result<Json<Value>, AppError> {
    let ticket = state.engine.get_ticket(ticket_id).await?;
    Ok(Json(json!(ticket)))
}

/// Patient response to an alert
pub async fn update_patient_status(
    State(state): State<Arc<QueueCellState>>,
    Path(ticket_id): Path<TicketId>,
    Json(request): Json<UpdatePatientStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let ticket = state.engine.update_patient_status(ticket_id, request.status).await?;

    Ok(Json(json!({
        "success": true,
        "ticket": ticket
    })))
}

pub async fn complete_patient(
    State(state): State<Arc<QueueCellState>>,
    Path(ticket_id): Path<TicketId>,
) -> Result<Json<Value>, AppError> {
    let ticket = state.engine.complete_patient(ticket_id).await?;

    Ok(Json(json!({
        "success": true,
        "ticket": ticket
    })))
}

pub async fn send_alert(
    State(state): State<Arc<QueueCellState>>,
    Path(ticket_id): Path<TicketId>,
    Json(request): Json<SendAlertRequest>,
) -> Result<Json<Value>, AppError> {
    let ticket = state
        .dispatcher
        .send_alert_to_patient(ticket_id, request.channel, request.message)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} alert sent to {}", request.channel, ticket.patient_name),
        "ticket": ticket
    })))
}

pub async fn get_ticket_position(
    State(state): State<Arc<QueueCellState>>,
    Path(ticket_id): Path<TicketId>,
) -> Result<Json<Value>, AppError> {
    let position = state.engine.ticket_position(ticket_id).await?;
    Ok(Json(json!(position)))
}

pub async fn get_snapshot(
    State(state): State<Arc<QueueCellState>>,
) -> Result<Json<Value>, AppError> {
    let snapshot = state.engine.snapshot().await;
    Ok(Json(json!(snapshot)))
}

pub async fn list_history(
    State(state): State<Arc<QueueCellState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let records = state.history.list(query.patient_name.as_deref()).await;

    Ok(Json(json!({
        "records": records,
        "total": records.len()
    })))
}

pub async fn add_report(
    State(state): State<Arc<QueueCellState>>,
    Json(report): Json<NewReport>,
) -> Result<Json<Value>, AppError> {
    let record = state.history.add_report(report).await?;

    Ok(Json(json!({
        "success": true,
        "record": record
    })))
}
