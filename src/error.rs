//! Error types for zonesched
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in zonesched
#[derive(Debug, Error)]
pub enum ZoneschedError {
    /// Period construction or time/day parsing failed
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Zone actuation failed
    #[error("Zone error: {0}")]
    Zone(String),

    /// Defective collaborator wiring (e.g. a broken schedule updater)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Schedule refresh failed (I/O-class, retried on the next tick)
    #[error("Schedule update failed: {0}")]
    Update(String),

    /// Schedule refresh did not return in time
    #[error("Schedule update timed out after {0} ms")]
    UpdateTimeout(u64),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for zonesched operations
pub type Result<T> = std::result::Result<T, ZoneschedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_period_error() {
        let err = ZoneschedError::InvalidPeriod("duration 500 is less than a minute".to_string());
        assert_eq!(err.to_string(), "Invalid period: duration 500 is less than a minute");
    }

    #[test]
    fn test_zone_error() {
        let err = ZoneschedError::Zone("damper stuck".to_string());
        assert_eq!(err.to_string(), "Zone error: damper stuck");
    }

    #[test]
    fn test_configuration_error() {
        let err = ZoneschedError::Configuration("updater produced no schedule".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: updater produced no schedule"
        );
    }

    #[test]
    fn test_update_error() {
        let err = ZoneschedError::Update("connection refused".to_string());
        assert_eq!(err.to_string(), "Schedule update failed: connection refused");
    }

    #[test]
    fn test_update_timeout_error() {
        let err = ZoneschedError::UpdateTimeout(30000);
        assert_eq!(err.to_string(), "Schedule update timed out after 30000 ms");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ZoneschedError = io_err.into();
        assert!(matches!(err, ZoneschedError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ZoneschedError = json_err.into();
        assert!(matches!(err, ZoneschedError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(ZoneschedError::Zone("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
