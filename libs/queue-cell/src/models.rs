use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use directory_cell::{DoctorId, HospitalId};

pub type TicketId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Waiting,
    Confirmed,
    Delayed,
    Serving,
    Completed,
    Cancelled,
}

impl TicketStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }

    /// Statuses `next_patient` may pick from.
    pub fn is_callable(&self) -> bool {
        matches!(self, TicketStatus::Waiting | TicketStatus::Confirmed)
    }

    /// Statuses a patient may send in reply to an alert.
    pub fn is_patient_response(&self) -> bool {
        matches!(self, TicketStatus::Confirmed | TicketStatus::Delayed | TicketStatus::Cancelled)
    }

    pub fn can_transition_to(&self, target: &TicketStatus) -> bool {
        use TicketStatus::*;
        match (self, target) {
            (from, _) if from.is_terminal() => false,
            (Waiting | Confirmed | Delayed, Confirmed | Delayed) => true,
            (Waiting | Confirmed, Serving) => true,
            (Serving, Completed) => true,
            (_, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Confirmed => "confirmed",
            TicketStatus::Delayed => "delayed",
            TicketStatus::Serving => "serving",
            TicketStatus::Completed => "completed",
            TicketStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertChannel {
    #[serde(rename = "SMS", alias = "Sms")]
    Sms,
    WhatsApp,
    Email,
}

impl fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertChannel::Sms => "SMS",
            AlertChannel::WhatsApp => "WhatsApp",
            AlertChannel::Email => "Email",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
}

impl ContactDetails {
    /// Address an alert on `channel` would be delivered to.
    pub fn recipient_for(&self, channel: AlertChannel) -> Option<&str> {
        match channel {
            AlertChannel::Sms => self.mobile.as_deref(),
            AlertChannel::WhatsApp => self.whatsapp.as_deref().or(self.mobile.as_deref()),
            AlertChannel::Email => self.email.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: String,
    #[serde(flatten)]
    pub contact: ContactDetails,
}

impl PatientDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: ContactDetails::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub token: String,
    pub patient_name: String,
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub hospital_id: HospitalId,
    pub doctor_id: DoctorId,
    pub status: TicketStatus,
    pub is_emergency: bool,
    pub alert_sent: Option<AlertChannel>,
    pub last_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(
        token: String,
        details: PatientDetails,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            token,
            patient_name: details.name.trim().to_string(),
            contact: details.contact,
            hospital_id,
            doctor_id,
            status: TicketStatus::Waiting,
            is_emergency: false,
            alert_sent: None,
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn default_alert_message(&self) -> String {
        format!("Your appointment number is {}. Please be ready.", self.token)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Result of a successful `next_patient` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeOutcome {
    pub now_serving: Ticket,
    /// Previous `serving` ticket for the doctor, auto-completed by this call.
    pub completed: Option<Ticket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePosition {
    pub ticket_id: TicketId,
    pub token: String,
    pub status: TicketStatus,
    pub people_ahead: usize,
    pub estimated_wait_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingEntry {
    pub hospital_id: HospitalId,
    pub doctor_id: DoctorId,
    pub token: String,
}

/// Materialized queue state exchanged with a persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub tickets: Vec<Ticket>,
    pub current_serving: Vec<ServingEntry>,
    pub taken_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueEventKind {
    TicketJoined,
    NowServing,
    VisitCompleted,
    TicketPrioritized,
    PatientResponded,
    AlertRecorded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEvent {
    pub kind: QueueEventKind,
    pub hospital_id: HospitalId,
    pub doctor_id: DoctorId,
    pub ticket_id: TicketId,
    pub token: String,
    pub status: TicketStatus,
    pub timestamp: DateTime<Utc>,
}

impl QueueEvent {
    pub fn from_ticket(kind: QueueEventKind, ticket: &Ticket) -> Self {
        Self {
            kind,
            hospital_id: ticket.hospital_id,
            doctor_id: ticket.doctor_id,
            ticket_id: ticket.id,
            token: ticket.token.clone(),
            status: ticket.status,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: Uuid,
    pub patient_name: String,
    pub hospital: String,
    pub doctor: String,
    pub date: NaiveDate,
    pub diagnosis: String,
    pub prescription: String,
    pub report_url: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub patient_name: String,
    pub hospital: String,
    pub doctor: String,
    pub date: Option<NaiveDate>,
    pub diagnosis: String,
    pub prescription: String,
    pub report_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePatientStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendAlertRequest {
    pub channel: AlertChannel,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub patient_name: Option<String>,
}
