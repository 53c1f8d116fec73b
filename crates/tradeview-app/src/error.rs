//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tradeview_ws::WsError),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] tradeview_dashboard::DashboardError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] tradeview_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
