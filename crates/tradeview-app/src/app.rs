//! Main application orchestration.
//!
//! Receives channel events, renders them into the shared page and keeps
//! the dashboard server running alongside.

use crate::config::AppConfig;
use crate::error::AppResult;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tradeview_dashboard::{run_server, DashboardState};
use tradeview_view::ViewUpdater;
use tradeview_ws::{ChannelEvent, PushChannel};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Counters reported at shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventStats {
    pub connects: u64,
    pub rendered: u64,
    pub render_errors: u64,
    pub unknown: u64,
}

/// Main application.
pub struct Application {
    config: AppConfig,
    view: ViewUpdater,
    dashboard: DashboardState,
    stats: EventStats,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let time_format = config.view.time_format()?;
        let regions = config.view.regions.clone();
        Ok(Self {
            view: ViewUpdater::new(regions.clone(), time_format),
            dashboard: DashboardState::with_skeleton(regions),
            stats: EventStats::default(),
            config,
        })
    }

    /// Shared page state, as served by the dashboard.
    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    pub fn stats(&self) -> EventStats {
        self.stats
    }

    /// Apply one channel event. Returns `false` once the channel has ended.
    pub fn handle_event(&mut self, event: ChannelEvent) -> bool {
        match event {
            ChannelEvent::Connected { sid } => {
                self.stats.connects += 1;
                info!(?sid, "Connected to push channel");
            }
            ChannelEvent::Message(msg) => {
                let view = &self.view;
                match self.dashboard.update(|doc| view.handle(doc, &msg)) {
                    Ok(report) => {
                        self.stats.rendered += 1;
                        debug!(
                            event = msg.event_name(),
                            updated = report.updated.len(),
                            unchanged = report.unchanged.len(),
                            skipped = ?report.skipped,
                            "Rendered update"
                        );
                    }
                    Err(e) => {
                        self.stats.render_errors += 1;
                        warn!(event = msg.event_name(), error = %e, "Render aborted");
                    }
                }
            }
            ChannelEvent::Unknown { name } => {
                self.stats.unknown += 1;
                debug!(%name, "Ignoring unhandled event");
            }
            ChannelEvent::Disconnected { reason } => {
                warn!(%reason, "Push channel disconnected");
                return false;
            }
        }
        true
    }

    /// Run until Ctrl-C, or until the channel ends with no dashboard to serve.
    pub async fn run(mut self) -> AppResult<()> {
        info!(url = %self.config.channel.url, "Starting application");

        let (event_tx, mut event_rx) = mpsc::channel::<ChannelEvent>(EVENT_CHANNEL_CAPACITY);

        let channel = Arc::new(PushChannel::new(self.config.channel.clone(), event_tx));
        let channel_clone = channel.clone();
        let channel_handle = tokio::spawn(async move {
            if let Err(e) = channel_clone.run().await {
                error!(?e, "Push channel failed");
            }
        });

        let shutdown = CancellationToken::new();
        let server_handle = if self.config.dashboard.enabled {
            let state = self.dashboard.clone();
            let config = self.config.dashboard.clone();
            let token = shutdown.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = run_server(state, config, token).await {
                    error!(?e, "Dashboard server failed");
                }
            }))
        } else {
            None
        };

        info!("Entering main event loop");
        let mut channel_open = true;
        loop {
            tokio::select! {
                maybe_event = event_rx.recv(), if channel_open => {
                    let live = match maybe_event {
                        Some(event) => self.handle_event(event),
                        None => false,
                    };
                    if !live {
                        channel_open = false;
                        if server_handle.is_none() {
                            info!("Push channel ended, nothing left to serve");
                            break;
                        }
                        info!("Push channel ended, dashboard keeps serving the last state");
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        let stats = self.stats;
        info!(
            connects = stats.connects,
            rendered = stats.rendered,
            render_errors = stats.render_errors,
            unknown = stats.unknown,
            revision = self.dashboard.revision(),
            "Shutting down"
        );

        channel.shutdown();
        shutdown.cancel();
        if let Err(e) = channel_handle.await {
            warn!(?e, "Push channel task ended abnormally");
        }
        if let Some(handle) = server_handle {
            if let Err(e) = handle.await {
                warn!(?e, "Dashboard task ended abnormally");
            }
        }

        Ok(())
    }
}
