//! Inbound message kinds.

use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::message::{DataUpdateMessage, TradeUpdateMessage};

/// Event emitted once the channel has joined its namespace.
pub const CONNECT_EVENT: &str = "connect";
/// Event carrying a [`DataUpdateMessage`].
pub const DATA_UPDATE_EVENT: &str = "data_update";
/// Event carrying a [`TradeUpdateMessage`].
pub const TRADE_UPDATE_EVENT: &str = "trade_update";

/// Messages the view reacts to (tagged by event name).
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    DataUpdate(DataUpdateMessage),
    TradeUpdate(TradeUpdateMessage),
}

impl InboundMessage {
    /// Decode a named event and its JSON payload.
    pub fn from_event(name: &str, payload: Value) -> Result<Self> {
        let malformed = |source| CoreError::MalformedPayload {
            event: name.to_string(),
            source,
        };

        match name {
            DATA_UPDATE_EVENT => serde_json::from_value(payload)
                .map(Self::DataUpdate)
                .map_err(malformed),
            TRADE_UPDATE_EVENT => serde_json::from_value(payload)
                .map(Self::TradeUpdate)
                .map_err(malformed),
            other => Err(CoreError::UnknownEvent(other.to_string())),
        }
    }

    /// The event name this message arrived under.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::DataUpdate(_) => DATA_UPDATE_EVENT,
            Self::TradeUpdate(_) => TRADE_UPDATE_EVENT,
        }
    }
}
