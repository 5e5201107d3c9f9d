use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{HistoryRecord, NewReport};
use crate::services::validation::validate_report;
use crate::QueueError;

/// Append-only log of completed visits, read newest first.
#[derive(Default)]
pub struct PatientHistoryLog {
    records: RwLock<Vec<HistoryRecord>>,
}

impl PatientHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn add_report(&self, report: NewReport) -> Result<HistoryRecord, QueueError> {
        validate_report(&report)?;

        let now = Utc::now();
        let record = HistoryRecord {
            id: Uuid::new_v4(),
            patient_name: report.patient_name.trim().to_string(),
            hospital: report.hospital,
            doctor: report.doctor,
            date: report.date.unwrap_or_else(|| now.date_naive()),
            diagnosis: report.diagnosis,
            prescription: report.prescription,
            report_url: report.report_url,
            recorded_at: now,
        };

        self.records.write().await.push(record.clone());
        info!("Visit report added for {} at {}", record.patient_name, record.hospital);
        Ok(record)
    }

    pub async fn list(&self, patient_name: Option<&str>) -> Vec<HistoryRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .rev()
            .filter(|r| match patient_name {
                Some(name) => r.patient_name.eq_ignore_ascii_case(name.trim()),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
