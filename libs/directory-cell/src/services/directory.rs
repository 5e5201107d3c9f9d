use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{DirectoryFeed, Doctor, DoctorId, DoctorStatus, Hospital, HospitalId};
use crate::DirectoryError;

/// Registry of hospitals and their doctors.
///
/// The set of hospitals and doctors is fixed at construction; only doctor
/// status changes afterwards, and only through [`crate::StatusController`].
#[derive(Debug)]
pub struct HospitalDirectory {
    hospitals: RwLock<Vec<Hospital>>,
    index: HashMap<HospitalId, usize>,
}

impl HospitalDirectory {
    pub fn from_feed(feed: DirectoryFeed) -> Result<Self, DirectoryError> {
        let mut index = HashMap::with_capacity(feed.len());

        for (position, hospital) in feed.iter().enumerate() {
            if hospital.name.trim().is_empty() {
                return Err(DirectoryError::InvalidFeed(format!(
                    "hospital {} has an empty name",
                    hospital.id
                )));
            }

            if index.insert(hospital.id, position).is_some() {
                return Err(DirectoryError::InvalidFeed(format!(
                    "duplicate hospital id {}",
                    hospital.id
                )));
            }

            let mut doctor_ids = HashSet::with_capacity(hospital.doctors.len());
            for doctor in &hospital.doctors {
                if !doctor_ids.insert(doctor.id) {
                    return Err(DirectoryError::InvalidFeed(format!(
                        "duplicate doctor id {} in hospital {}",
                        doctor.id, hospital.id
                    )));
                }
            }
        }

        info!(
            "Hospital directory initialized with {} hospitals and {} doctors",
            feed.len(),
            feed.iter().map(|h| h.doctors.len()).sum::<usize>()
        );

        Ok(Self {
            hospitals: RwLock::new(feed),
            index,
        })
    }

    /// Hospital ids in feed order.
    pub fn hospital_ids(&self) -> Vec<HospitalId> {
        let mut ids: Vec<(usize, HospitalId)> = self.index.iter().map(|(id, pos)| (*pos, *id)).collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn contains_hospital(&self, hospital_id: HospitalId) -> bool {
        self.index.contains_key(&hospital_id)
    }

    pub async fn list_hospitals(&self) -> Vec<Hospital> {
        self.hospitals.read().await.clone()
    }

    pub async fn search(&self, query: &str) -> Vec<Hospital> {
        let hospitals = self.hospitals.read().await;
        let matches: Vec<Hospital> = hospitals
            .iter()
            .filter(|h| h.matches_query(query))
            .cloned()
            .collect();

        debug!("Directory search '{}' matched {} hospitals", query, matches.len());
        matches
    }

    pub async fn get_hospital(&self, hospital_id: HospitalId) -> Result<Hospital, DirectoryError> {
        let position = self.position(hospital_id)?;
        let hospitals = self.hospitals.read().await;
        Ok(hospitals[position].clone())
    }

    pub async fn get_doctor(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Result<Doctor, DirectoryError> {
        let position = self.position(hospital_id)?;
        let hospitals = self.hospitals.read().await;
        hospitals[position]
            .doctor(doctor_id)
            .cloned()
            .ok_or(DirectoryError::DoctorNotFound { hospital_id, doctor_id })
    }

    pub async fn doctor_status(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Result<DoctorStatus, DirectoryError> {
        Ok(self.get_doctor(hospital_id, doctor_id).await?.status)
    }

    pub(crate) async fn set_doctor_status(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
        status: DoctorStatus,
    ) -> Result<(DoctorStatus, Doctor), DirectoryError> {
        let position = self.position(hospital_id)?;
        let mut hospitals = self.hospitals.write().await;
        let doctor = hospitals[position]
            .doctor_mut(doctor_id)
            .ok_or(DirectoryError::DoctorNotFound { hospital_id, doctor_id })?;

        let previous = doctor.status;
        doctor.status = status;
        Ok((previous, doctor.clone()))
    }

    fn position(&self, hospital_id: HospitalId) -> Result<usize, DirectoryError> {
        self.index
            .get(&hospital_id)
            .copied()
            .ok_or(DirectoryError::HospitalNotFound(hospital_id))
    }
}
