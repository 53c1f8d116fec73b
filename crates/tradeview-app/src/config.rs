//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tradeview_dashboard::DashboardConfig;
use tradeview_telemetry::LoggingConfig;
use tradeview_view::{RegionIds, TimeFormat};
use tradeview_ws::PushChannelConfig;

/// `[view]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Display offset east of UTC in minutes. Unset = host local time.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    /// Region id overrides.
    #[serde(default)]
    pub regions: RegionIds,
}

impl ViewConfig {
    pub fn time_format(&self) -> AppResult<TimeFormat> {
        match self.utc_offset_minutes {
            None => Ok(TimeFormat::local()),
            Some(minutes) => TimeFormat::from_offset_minutes(minutes).ok_or_else(|| {
                AppError::Config(format!("utc_offset_minutes out of range: {minutes}"))
            }),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub channel: PushChannelConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later at runtime.
    pub fn validate(&self) -> AppResult<()> {
        if !self.channel.url.starts_with("ws://") && !self.channel.url.starts_with("wss://") {
            return Err(AppError::Config(format!(
                "channel.url must be a ws:// or wss:// URL, got {}",
                self.channel.url
            )));
        }
        if !self.channel.namespace.starts_with('/') {
            return Err(AppError::Config(format!(
                "channel.namespace must start with '/', got {}",
                self.channel.namespace
            )));
        }
        self.view.time_format()?;
        Ok(())
    }
}
