use std::sync::OnceLock;

use regex::Regex;

use crate::models::{NewReport, PatientDetails};
use crate::QueueError;

const MAX_NAME_LENGTH: usize = 100;
const MAX_FREE_TEXT_LENGTH: usize = 1000;
const MAX_AGE: u8 = 130;

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("phone pattern is valid"))
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"))
}

fn require_name(field: &str, value: &str) -> Result<(), QueueError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QueueError::ValidationError(format!("{} is required", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(QueueError::ValidationError(format!(
            "{} exceeds {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn check_optional(field: &str, value: Option<&str>, pattern: &Regex) -> Result<(), QueueError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && !pattern.is_match(v) => {
            Err(QueueError::ValidationError(format!("{} '{}' is not valid", field, v)))
        }
        _ => Ok(()),
    }
}

pub fn validate_patient_details(details: &PatientDetails) -> Result<(), QueueError> {
    require_name("name", &details.name)?;

    let contact = &details.contact;
    check_optional("mobile", contact.mobile.as_deref(), phone_pattern())?;
    check_optional("whatsapp", contact.whatsapp.as_deref(), phone_pattern())?;
    check_optional("email", contact.email.as_deref(), email_pattern())?;

    if let Some(age) = contact.age {
        if age > MAX_AGE {
            return Err(QueueError::ValidationError(format!("age {} is out of range", age)));
        }
    }

    if let Some(symptoms) = &contact.symptoms {
        if symptoms.chars().count() > MAX_FREE_TEXT_LENGTH {
            return Err(QueueError::ValidationError(format!(
                "symptoms exceed {} characters",
                MAX_FREE_TEXT_LENGTH
            )));
        }
    }

    Ok(())
}

pub fn validate_report(report: &NewReport) -> Result<(), QueueError> {
    require_name("patientName", &report.patient_name)?;
    require_name("hospital", &report.hospital)?;
    require_name("doctor", &report.doctor)?;

    if report.diagnosis.trim().is_empty() {
        return Err(QueueError::ValidationError("diagnosis is required".to_string()));
    }
    for (field, value) in [("diagnosis", &report.diagnosis), ("prescription", &report.prescription)] {
        if value.chars().count() > MAX_FREE_TEXT_LENGTH {
            return Err(QueueError::ValidationError(format!(
                "{} exceeds {} characters",
                field, MAX_FREE_TEXT_LENGTH
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactDetails;

    fn details(name: &str, contact: ContactDetails) -> PatientDetails {
        PatientDetails {
            name: name.to_string(),
            contact,
        }
    }

    #[test]
    fn name_is_required() {
        let result = validate_patient_details(&details("   ", ContactDetails::default()));
        assert!(matches!(result, Err(QueueError::ValidationError(_))));
    }

    #[test]
    fn accepts_indian_mobile_formats() {
        for mobile in ["9822012345", "+91 98220 12345", "+91-20-66455100"] {
            let contact = ContactDetails {
                mobile: Some(mobile.to_string()),
                ..ContactDetails::default()
            };
            assert!(validate_patient_details(&details("Amit", contact)).is_ok(), "{mobile}");
        }
    }

    #[test]
    fn rejects_bad_contact_fields() {
        let bad_mobile = ContactDetails {
            mobile: Some("call me".to_string()),
            ..ContactDetails::default()
        };
        assert!(validate_patient_details(&details("Amit", bad_mobile)).is_err());

        let bad_email = ContactDetails {
            email: Some("amit.example.com".to_string()),
            ..ContactDetails::default()
        };
        assert!(validate_patient_details(&details("Amit", bad_email)).is_err());

        let bad_age = ContactDetails {
            age: Some(200),
            ..ContactDetails::default()
        };
        assert!(validate_patient_details(&details("Amit", bad_age)).is_err());
    }

    #[test]
    fn blank_optional_fields_are_ignored() {
        let contact = ContactDetails {
            email: Some("  ".to_string()),
            ..ContactDetails::default()
        };
        assert!(validate_patient_details(&details("Amit", contact)).is_ok());
    }
}
