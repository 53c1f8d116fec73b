//! Telemetry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
