//! Core message types for the tradeview dashboard.
//!
//! This crate provides the data model shared by the push channel and the
//! view layer:
//! - `DataUpdateMessage`, `TradeUpdateMessage`: server push payloads
//! - `LastActions`: total symbol -> last-action lookup
//! - `Timestamp`: lenient timestamp decoding
//! - `InboundMessage`: tagged union of the events the view reacts to

pub mod error;
pub mod inbound;
pub mod last_action;
pub mod message;
pub mod timestamp;

pub use error::{CoreError, Result};
pub use inbound::{InboundMessage, CONNECT_EVENT, DATA_UPDATE_EVENT, TRADE_UPDATE_EVENT};
pub use last_action::{LastActionRecord, LastActionState, LastActions};
pub use message::{DataUpdateMessage, SymbolSnapshot, TradeRecord, TradeUpdateMessage};
pub use timestamp::Timestamp;
