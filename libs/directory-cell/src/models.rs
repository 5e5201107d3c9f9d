use std::fmt;

use serde::{Deserialize, Serialize};

pub type HospitalId = u32;
pub type DoctorId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoctorStatus {
    Available,
    Unavailable,
    #[serde(alias = "On Break")]
    OnBreak,
}

impl DoctorStatus {
    pub fn accepts_patients(&self) -> bool {
        matches!(self, DoctorStatus::Available)
    }
}

impl fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DoctorStatus::Available => "Available",
            DoctorStatus::Unavailable => "Unavailable",
            DoctorStatus::OnBreak => "On Break",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialty: String,
    pub room: String,
    pub timings: String,
    pub status: DoctorStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub branch: String,
    pub address: String,
    pub emergency_contact: String,
    #[serde(default)]
    pub doctors: Vec<Doctor>,
}

impl Hospital {
    pub fn doctor(&self, doctor_id: DoctorId) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == doctor_id)
    }

    pub fn doctor_mut(&mut self, doctor_id: DoctorId) -> Option<&mut Doctor> {
        self.doctors.iter_mut().find(|d| d.id == doctor_id)
    }

    /// Case-insensitive match against name, branch and address.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [&self.name, &self.branch, &self.address]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Directory state handed to the engine at boot.
pub type DirectoryFeed = Vec<Hospital>;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDoctorStatusRequest {
    pub status: DoctorStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HospitalSearchQuery {
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_break_accepts_display_spelling() {
        let status: DoctorStatus = serde_json::from_str("\"On Break\"").unwrap();
        assert_eq!(status, DoctorStatus::OnBreak);
        let status: DoctorStatus = serde_json::from_str("\"OnBreak\"").unwrap();
        assert_eq!(status, DoctorStatus::OnBreak);
        assert_eq!(status.to_string(), "On Break");
    }

    #[test]
    fn only_available_accepts_patients() {
        assert!(DoctorStatus::Available.accepts_patients());
        assert!(!DoctorStatus::Unavailable.accepts_patients());
        assert!(!DoctorStatus::OnBreak.accepts_patients());
    }

    #[test]
    fn blank_query_matches_everything() {
        let hospital = Hospital {
            id: 1,
            name: "Ruby Hall Clinic".to_string(),
            branch: "Sassoon Road".to_string(),
            address: "40, Sassoon Rd, Pune".to_string(),
            emergency_contact: "+91-20-66455100".to_string(),
            doctors: vec![],
        };
        assert!(hospital.matches_query("   "));
        assert!(hospital.matches_query("sassoon"));
        assert!(hospital.matches_query("RUBY"));
        assert!(!hospital.matches_query("Jehangir"));
    }
}
