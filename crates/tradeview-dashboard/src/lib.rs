//! tradeview-dashboard - HTTP view of the rendered page.
//!
//! The application loop writes push updates into a shared [`Document`];
//! this crate serves it:
//!
//! ```text
//!  ChannelEvent ─► ViewUpdater ─► DashboardState (Arc<RwLock<Document>>)
//!                                        │
//!                       axum HTTP Server ┤
//!                         GET /            → rendered page
//!                         GET /api/regions → region texts as JSON
//! ```
//!
//! [`Document`]: tradeview_view::Document

mod config;
mod error;
mod server;
mod state;
mod types;

pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult};
pub use server::{create_router, run_server};
pub use state::DashboardState;
pub use types::RegionsSnapshot;
