//! Events delivered to the application.

use serde_json::Value;
use tradeview_core::{CoreError, InboundMessage};

/// Notification forwarded from the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Namespace joined (`connect`).
    Connected { sid: Option<String> },
    /// A message the view handles.
    Message(InboundMessage),
    /// An event name no handler is registered for.
    Unknown { name: String },
    /// The server or transport ended the session.
    Disconnected { reason: String },
}

impl ChannelEvent {
    /// Classify a Socket.IO event. Known names with undecodable payloads
    /// are errors; unknown names are passed through.
    pub fn from_event(name: &str, payload: Value) -> tradeview_core::Result<Self> {
        match InboundMessage::from_event(name, payload) {
            Ok(msg) => Ok(Self::Message(msg)),
            Err(CoreError::UnknownEvent(name)) => Ok(Self::Unknown { name }),
            Err(e) => Err(e),
        }
    }
}
