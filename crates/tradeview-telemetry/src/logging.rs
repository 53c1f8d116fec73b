//! Structured logging initialization.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{TelemetryError, TelemetryResult};

/// Filter used when neither `RUST_LOG` nor the config sets one.
const DEFAULT_FILTER: &str = "info,tradeview=debug";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON when `RUST_ENV=production`, pretty otherwise.
    #[default]
    Auto,
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Resolve `Auto` against the `RUST_ENV` value.
    pub fn resolve(self, rust_env: Option<&str>) -> Self {
        match self {
            Self::Auto if rust_env == Some("production") => Self::Json,
            Self::Auto => Self::Pretty,
            other => other,
        }
    }
}

/// `[logging]` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Filter directives; `RUST_LOG` takes precedence.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &LoggingConfig) -> TelemetryResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = config.filter.as_deref().unwrap_or(DEFAULT_FILTER);
            EnvFilter::try_new(directives)
                .map_err(|e| TelemetryError::InvalidFilter(format!("{directives}: {e}")))?
        }
    };

    let rust_env = std::env::var("RUST_ENV").ok();
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format.resolve(rust_env.as_deref()) {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(true))
            .try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact().with_target(true)).try_init(),
        LogFormat::Pretty | LogFormat::Auto => registry
            .with(fmt::layer().pretty().with_target(true).with_thread_names(true))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
