//! tradeview - push-driven trading dashboard view.
//!
//! Wires the components together:
//! - Socket.IO push channel (`tradeview-ws`)
//! - View updater writing into the shared page (`tradeview-view`)
//! - HTTP server exposing the page (`tradeview-dashboard`)

pub mod app;
pub mod config;
pub mod error;

pub use app::{Application, EventStats};
pub use config::{AppConfig, ViewConfig};
pub use error::{AppError, AppResult};
