//! Error types for gyre
//!
//! Centralized error handling using thiserror.
//!
//! Actuator-level failures are deliberately absent here: an actuator
//! reports expected failure modes through `ActionOutcome`, never through
//! this enum. Only faults in injected strategies and in the engine's own
//! plumbing surface as errors.

use thiserror::Error;

/// All error types that can occur in gyre
#[derive(Debug, Error)]
pub enum GyreError {
    /// An injected planner failed to produce an action
    #[error("Planner error: {0}")]
    Planner(String),

    /// An injected normalizer failed to produce facts
    #[error("Normalizer error: {0}")]
    Normalizer(String),

    /// An injected decider failed to produce a decision
    #[error("Decider error: {0}")]
    Decider(String),

    /// The bound actuator reports it cannot execute anything
    #[error("Actuator unavailable: {0}")]
    ActuatorUnavailable(String),

    /// Invalid state transition or operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for gyre operations
pub type Result<T> = std::result::Result<T, GyreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_error() {
        let err = GyreError::Planner("no candidate actions".to_string());
        assert_eq!(err.to_string(), "Planner error: no candidate actions");
    }

    #[test]
    fn test_decider_error() {
        let err = GyreError::Decider("empty reasoning".to_string());
        assert_eq!(err.to_string(), "Decider error: empty reasoning");
    }

    #[test]
    fn test_actuator_unavailable_error() {
        let err = GyreError::ActuatorUnavailable("shell not found".to_string());
        assert_eq!(err.to_string(), "Actuator unavailable: shell not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GyreError = io_err.into();
        assert!(matches!(err, GyreError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: GyreError = json_err.into();
        assert!(matches!(err, GyreError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(GyreError::InvalidState("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
