#![allow(dead_code)]

use std::sync::Arc;

use queue_cell::*;
use shared_utils::test_utils::{test_status_controller, TestConfig};

pub fn test_engine() -> Arc<SchedulingEngine> {
    Arc::new(SchedulingEngine::new(
        test_status_controller(),
        &TestConfig::default().to_app_config(),
    ))
}

pub fn patient(name: &str) -> PatientDetails {
    PatientDetails::named(name)
}

pub fn tokens(tickets: &[Ticket]) -> Vec<String> {
    tickets.iter().map(|t| t.token.clone()).collect()
}
