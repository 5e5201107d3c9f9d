use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{DirectoryFeed, Doctor, DoctorStatus, Hospital};

/// Reads a JSON directory feed from disk.
pub fn load_feed_from_path(path: impl AsRef<Path>) -> Result<DirectoryFeed> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read directory seed at {}", path.display()))?;
    let feed: DirectoryFeed = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse directory seed at {}", path.display()))?;

    info!("Loaded {} hospitals from {}", feed.len(), path.display());
    Ok(feed)
}

fn doctor(id: u32, name: &str, specialty: &str, room: &str, status: DoctorStatus, timings: &str) -> Doctor {
    Doctor {
        id,
        name: name.to_string(),
        specialty: specialty.to_string(),
        room: room.to_string(),
        timings: timings.to_string(),
        status,
    }
}

/// Built-in Pune directory used when no seed file is configured.
pub fn default_feed() -> DirectoryFeed {
    vec![
        Hospital {
            id: 1,
            name: "Ruby Hall Clinic".to_string(),
            branch: "Sassoon Road".to_string(),
            address: "40, Sassoon Rd, Pune".to_string(),
            emergency_contact: "+91-20-66455100".to_string(),
            doctors: vec![
                doctor(101, "Dr. A. K. Singh", "Cardiology", "101", DoctorStatus::Available,
                    "10:00 AM – 2:00 PM, 5:00 PM – 8:00 PM"),
                doctor(102, "Dr. P. Sharma", "Neurology", "202", DoctorStatus::Available,
                    "11:00 AM – 3:00 PM"),
            ],
        },
        Hospital {
            id: 2,
            name: "Jehangir Hospital".to_string(),
            branch: "Bund Garden".to_string(),
            address: "32, Sassoon Rd, Pune".to_string(),
            emergency_contact: "+91-20-49153000".to_string(),
            doctors: vec![
                doctor(201, "Dr. R. Deshpande", "Orthopedics", "Ortho-1", DoctorStatus::Available,
                    "09:00 AM – 1:00 PM"),
                doctor(202, "Dr. M. Kulkarni", "Pediatrics", "Ped-3", DoctorStatus::OnBreak,
                    "10:00 AM – 4:00 PM"),
            ],
        },
        Hospital {
            id: 3,
            name: "Sahyadri Hospital".to_string(),
            branch: "Deccan Gymkhana".to_string(),
            address: "Plot No. 30, Erandwane, Pune".to_string(),
            emergency_contact: "+91-20-67215000".to_string(),
            doctors: vec![
                doctor(301, "Dr. S. Joshi", "Oncology", "Onc-A", DoctorStatus::Available,
                    "02:00 PM – 6:00 PM"),
            ],
        },
        Hospital {
            id: 4,
            name: "Deenanath Mangeshkar".to_string(),
            branch: "Erandwane".to_string(),
            address: "Near Mhatre Bridge, Pune".to_string(),
            emergency_contact: "+91-20-40151000".to_string(),
            doctors: vec![
                doctor(401, "Dr. V. Gokhale", "General Surgery", "Surg-B", DoctorStatus::Available,
                    "08:00 AM – 12:00 PM"),
            ],
        },
        Hospital {
            id: 5,
            name: "Sancheti Hospital".to_string(),
            branch: "Shivajinagar".to_string(),
            address: "16, Shivajinagar, Pune".to_string(),
            emergency_contact: "+91-20-25533333".to_string(),
            doctors: vec![
                doctor(501, "Dr. P. Sancheti", "Orthopedics", "Ortho-Main", DoctorStatus::Available,
                    "09:00 AM – 12:00 PM"),
            ],
        },
    ]
}
