use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::models::{Doctor, DoctorId, DoctorStatus, HospitalId};
use crate::services::directory::HospitalDirectory;
use crate::DirectoryError;

/// Owns doctor availability changes and the admission gate for new tickets.
#[derive(Clone)]
pub struct StatusController {
    directory: Arc<HospitalDirectory>,
}

impl StatusController {
    pub fn new(directory: Arc<HospitalDirectory>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Arc<HospitalDirectory> {
        &self.directory
    }

    /// Existing tickets are left untouched; only future admissions change.
    #[instrument(skip(self))]
    pub async fn update_doctor_status(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
        status: DoctorStatus,
    ) -> Result<Doctor, DirectoryError> {
        let (previous, doctor) = self
            .directory
            .set_doctor_status(hospital_id, doctor_id, status)
            .await?;

        info!(
            "Doctor {} in hospital {} status changed from {} to {}",
            doctor_id, hospital_id, previous, status
        );
        Ok(doctor)
    }

    pub async fn check_admission(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Result<Doctor, DirectoryError> {
        let doctor = self.directory.get_doctor(hospital_id, doctor_id).await?;

        if !doctor.status.accepts_patients() {
            debug!("Admission refused for doctor {} ({})", doctor_id, doctor.status);
            return Err(DirectoryError::DoctorUnavailable {
                doctor_id,
                status: doctor.status,
            });
        }

        Ok(doctor)
    }
}
