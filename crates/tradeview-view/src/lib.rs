//! View layer for the tradeview page.
//!
//! Push handlers never touch markup directly. They build typed [`Node`]
//! trees and write them through a [`RenderTarget`]:
//!
//! ```text
//!  InboundMessage ──► ViewUpdater::handle ──► RenderTarget
//!                        │                     ├─ set_text(region, text)
//!                        │                     └─ replace_children(region, nodes)
//!                        └─ format (currency, time, last action)
//! ```
//!
//! [`Document`] is the in-memory render target used by the dashboard
//! server and by tests.

mod document;
mod error;
mod format;
mod node;
mod regions;
mod target;
mod updater;

pub use document::Document;
pub use error::{ViewError, ViewResult};
pub use format::{
    capitalize, currency, last_action_text, price_2dp, TimeFormat, INVALID_DATE, NO_ACTION_TAKEN,
    NO_TRADES, PRICE_NOT_AVAILABLE, TIME_NOT_AVAILABLE,
};
pub use node::{Element, Node};
pub use regions::RegionIds;
pub use target::RenderTarget;
pub use updater::{RenderReport, ViewUpdater};
