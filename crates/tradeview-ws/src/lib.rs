//! Push channel client for the tradeview dashboard.
//!
//! Speaks Socket.IO (protocol v5, Engine.IO v4) over a WebSocket:
//! - Engine.IO open handshake and namespace connect
//! - Server-driven ping/pong with ping-timeout detection
//! - Event decoding into [`ChannelEvent`]s delivered on an `mpsc` channel
//!
//! One connection attempt per [`PushChannel::run`]; reconnecting is left to
//! the caller.

pub mod connection;
pub mod error;
pub mod event;
pub mod heartbeat;
pub mod packet;

pub use connection::{ConnectionState, PushChannel, PushChannelConfig};
pub use error::{WsError, WsResult};
pub use event::ChannelEvent;
pub use heartbeat::HeartbeatMonitor;
pub use packet::{EnginePacket, OpenHandshake, SocketPacket};
