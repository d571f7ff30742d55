use tracing::{error, info};

pub fn log_step(step: &str) {
    info!(step, status = "SUCCESS", "Step finished");
}

pub fn log_action(action: &str, details: Option<&str>) {
    match details {
        Some(details) => info!(action, details, "Action"),
        None => info!(action, "Action"),
    }
}

/// Failed assertions are logged at error level
pub fn log_assertion(assertion: &str, passed: bool, details: Option<&str>) {
    match (passed, details) {
        (true, Some(details)) => info!(assertion, passed, details, "PASS"),
        (true, None) => info!(assertion, passed, "PASS"),
        (false, Some(details)) => error!(assertion, passed, details, "FAIL"),
        (false, None) => error!(assertion, passed, "FAIL"),
    }
}
