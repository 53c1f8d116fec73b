//! HTTP server implementation using axum.

use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::state::DashboardState;
use crate::types::RegionsSnapshot;

/// Create the axum router.
pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/regions", get(get_regions))
        .with_state(state)
}

/// Serve the rendered page.
async fn serve_index(State(state): State<DashboardState>) -> Html<String> {
    Html(state.render_html())
}

/// Current region texts as JSON.
async fn get_regions(State(state): State<DashboardState>) -> Json<RegionsSnapshot> {
    Json(state.collect_regions())
}

/// Run the dashboard HTTP server until `shutdown` is cancelled.
pub async fn run_server(
    state: DashboardState,
    config: DashboardConfig,
    shutdown: CancellationToken,
) -> DashboardResult<()> {
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| DashboardError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "Starting dashboard server");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Dashboard server stopped");
    Ok(())
}
