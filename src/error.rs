use thiserror::Error;

/// Failure taxonomy for the fleet model.
///
/// `Blocked` is an expected simulation outcome rather than a fault; the
/// status-code/boolean API surfaces it as 400/false, never as a panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("update blocked: {0}")]
    Blocked(String),
}

impl FleetError {
    pub fn node_not_found(uuid: &str) -> Self {
        FleetError::NotFound {
            kind: "node",
            id: uuid.to_string(),
        }
    }

    pub fn endpoint_not_found(serial: &str) -> Self {
        FleetError::NotFound {
            kind: "endpoint",
            id: serial.to_string(),
        }
    }

    pub fn channel_not_found(channel: &str) -> Self {
        FleetError::NotFound {
            kind: "ota channel",
            id: channel.to_string(),
        }
    }
}
