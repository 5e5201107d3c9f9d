use thiserror::Error;

use shared_models::error::AppError;

use crate::models::{DoctorId, DoctorStatus, HospitalId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectoryError {
    #[error("Hospital not found: {0}")]
    HospitalNotFound(HospitalId),

    #[error("Doctor {doctor_id} not found in hospital {hospital_id}")]
    DoctorNotFound { hospital_id: HospitalId, doctor_id: DoctorId },

    #[error("Doctor {doctor_id} is not accepting patients (status: {status})")]
    DoctorUnavailable { doctor_id: DoctorId, status: DoctorStatus },

    #[error("Invalid directory feed: {0}")]
    InvalidFeed(String),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::HospitalNotFound(_) | DirectoryError::DoctorNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            DirectoryError::DoctorUnavailable { .. } => AppError::Conflict(err.to_string()),
            DirectoryError::InvalidFeed(_) => AppError::ValidationError(err.to_string()),
        }
    }
}
