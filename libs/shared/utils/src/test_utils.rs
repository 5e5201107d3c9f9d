use std::sync::Arc;

use directory_cell::{
    DirectoryFeed, Doctor, DoctorId, DoctorStatus, Hospital, HospitalDirectory, HospitalId,
    StatusController,
};
use shared_config::AppConfig;

pub const CITY_HOSPITAL: HospitalId = 1;
pub const RIVER_HOSPITAL: HospitalId = 2;

pub const DR_AVAILABLE: DoctorId = 11;
pub const DR_UNAVAILABLE: DoctorId = 12;
pub const DR_ON_BREAK: DoctorId = 13;
pub const DR_SECOND_AVAILABLE: DoctorId = 14;
pub const DR_RIVER: DoctorId = 21;

pub struct TestConfig {
    pub token_prefix: String,
    pub token_base: u32,
    pub minutes_per_patient: u32,
    pub event_channel_capacity: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            token_prefix: "Q".to_string(),
            token_base: 100,
            minutes_per_patient: 15,
            event_channel_capacity: 64,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            bind_address: "127.0.0.1:0".to_string(),
            directory_seed_path: None,
            token_prefix: self.token_prefix.clone(),
            token_base: self.token_base,
            minutes_per_patient: self.minutes_per_patient,
            event_channel_capacity: self.event_channel_capacity,
        }
    }
}

/// Small builder for directory feeds used in tests.
#[derive(Default)]
pub struct TestDirectory {
    hospitals: Vec<Hospital>,
}

impl TestDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hospital(mut self, id: HospitalId, name: &str) -> Self {
        self.hospitals.push(Hospital {
            id,
            name: name.to_string(),
            branch: format!("{} Branch", name),
            address: format!("{} Road, Pune", name),
            emergency_contact: "+91-20-00000000".to_string(),
            doctors: Vec::new(),
        });
        self
    }

    /// Adds a doctor to the most recently added hospital.
    pub fn doctor(mut self, id: DoctorId, name: &str, status: DoctorStatus) -> Self {
        if let Some(hospital) = self.hospitals.last_mut() {
            hospital.doctors.push(Doctor {
                id,
                name: name.to_string(),
                specialty: "General Medicine".to_string(),
                room: format!("R-{}", id),
                timings: "09:00 AM – 1:00 PM".to_string(),
                status,
            });
        }
        self
    }

    pub fn build(self) -> DirectoryFeed {
        self.hospitals
    }
}

/// Two hospitals; the first has one doctor in each status plus a second
/// available doctor.
pub fn two_hospital_feed() -> DirectoryFeed {
    TestDirectory::new()
        .hospital(CITY_HOSPITAL, "City Hospital")
        .doctor(DR_AVAILABLE, "Dr. Available", DoctorStatus::Available)
        .doctor(DR_UNAVAILABLE, "Dr. Unavailable", DoctorStatus::Unavailable)
        .doctor(DR_ON_BREAK, "Dr. On Break", DoctorStatus::OnBreak)
        .doctor(DR_SECOND_AVAILABLE, "Dr. Second", DoctorStatus::Available)
        .hospital(RIVER_HOSPITAL, "River Hospital")
        .doctor(DR_RIVER, "Dr. River", DoctorStatus::Available)
        .build()
}

pub fn test_directory() -> Arc<HospitalDirectory> {
    Arc::new(HospitalDirectory::from_feed(two_hospital_feed()).expect("test feed should be valid"))
}

pub fn test_status_controller() -> StatusController {
    StatusController::new(test_directory())
}
