//! tradeview - Entry Point
//!
//! Renders trading-server push events into a live dashboard page.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Push-driven trading dashboard view
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via TRADEVIEW_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI arg > TRADEVIEW_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("TRADEVIEW_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = tradeview_app::AppConfig::from_file(&config_path)?;

    tradeview_telemetry::init_logging(&config.logging)?;

    info!("Starting tradeview v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        url = %config.channel.url,
        dashboard = config.dashboard.enabled,
        "Configuration loaded"
    );

    let app = tradeview_app::Application::new(config)?;
    app.run().await?;

    Ok(())
}
