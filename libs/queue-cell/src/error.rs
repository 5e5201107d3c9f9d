use thiserror::Error;

use directory_cell::{DirectoryError, DoctorId, DoctorStatus, HospitalId};
use shared_models::error::AppError;

use crate::models::TicketStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot {operation} ticket {token}: status is {status}")]
    InvalidState {
        token: String,
        status: TicketStatus,
        operation: &'static str,
    },

    #[error("Invalid ticket status transition from {from} to {to}")]
    InvalidTransition { from: TicketStatus, to: TicketStatus },

    #[error("Doctor {doctor_id} is not accepting patients (status: {status})")]
    DoctorUnavailable { doctor_id: DoctorId, status: DoctorStatus },

    #[error("Token {token} already issued in hospital {hospital_id}")]
    DuplicateToken { hospital_id: HospitalId, token: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<DirectoryError> for QueueError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::HospitalNotFound(_) | DirectoryError::DoctorNotFound { .. } => {
                QueueError::NotFound(err.to_string())
            }
            DirectoryError::DoctorUnavailable { doctor_id, status } => {
                QueueError::DoctorUnavailable { doctor_id, status }
            }
            DirectoryError::InvalidFeed(msg) => QueueError::ValidationError(msg),
        }
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::NotFound(_) => AppError::NotFound(err.to_string()),
            QueueError::InvalidState { .. }
            | QueueError::InvalidTransition { .. }
            | QueueError::DoctorUnavailable { .. } => AppError::Conflict(err.to_string()),
            QueueError::ValidationError(_) => AppError::ValidationError(err.to_string()),
            QueueError::DuplicateToken { .. } => AppError::Internal(err.to_string()),
        }
    }
}
