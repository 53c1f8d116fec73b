//! Push channel connection.
//!
//! Runs a single Socket.IO session: WebSocket connect, Engine.IO open
//! handshake, namespace join, then forwards events until the server leaves,
//! the heartbeat lapses, or shutdown is requested.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{WsError, WsResult};
use crate::event::ChannelEvent;
use crate::heartbeat::HeartbeatMonitor;
use crate::packet::{EnginePacket, SocketPacket, ROOT_NAMESPACE};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// WebSocket close code for a normal end of session.
const NORMAL_CLOSE: u16 = 1000;

/// Heartbeat check ticker. Ticks on a fixed schedule regardless of traffic.
fn heartbeat_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Push channel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushChannelConfig {
    /// Full Socket.IO WebSocket URL,
    /// e.g. `ws://host:5000/socket.io/?EIO=4&transport=websocket`.
    #[serde(default = "default_url")]
    pub url: String,
    /// Socket.IO namespace to join.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Time allowed for the WebSocket handshake.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_url() -> String {
    "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket".to_string()
}

fn default_namespace() -> String {
    ROOT_NAMESPACE.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

impl Default for PushChannelConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            namespace: default_namespace(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    /// WebSocket open, namespace not joined yet.
    Handshaking,
    Connected,
    Closed,
}

/// Whether the read loop keeps going after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Socket.IO push channel client.
pub struct PushChannel {
    config: PushChannelConfig,
    state: Arc<RwLock<ConnectionState>>,
    event_tx: mpsc::Sender<ChannelEvent>,
    shutdown_token: CancellationToken,
}

impl PushChannel {
    pub fn new(config: PushChannelConfig, event_tx: mpsc::Sender<ChannelEvent>) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            event_tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Request a graceful disconnect.
    pub fn shutdown(&self) {
        info!("PushChannel shutdown requested");
        self.shutdown_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Connect and forward events until the session ends.
    ///
    /// Returns `Ok(())` on a clean end (server disconnect, normal close frame,
    /// stream end or shutdown). A `Disconnected` event is sent in every case except
    /// shutdown.
    pub async fn run(&self) -> WsResult<()> {
        *self.state.write() = ConnectionState::Connecting;
        let result = self.run_session().await;
        *self.state.write() = match result {
            Ok(()) if self.is_shutdown() => ConnectionState::Disconnected,
            _ => ConnectionState::Closed,
        };

        if let Err(e) = &result {
            error!(?e, "Push channel session failed");
            self.emit(ChannelEvent::Disconnected {
                reason: e.to_string(),
            })
            .await;
        }
        result
    }

    async fn run_session(&self) -> WsResult<()> {
        info!(url = %self.config.url, namespace = %self.config.namespace, "Connecting to push channel");

        let connect_timeout = Duration::from_millis(self.config.connect_timeout_ms);
        let (ws_stream, _response) = tokio::time::timeout(connect_timeout, connect_async(&self.config.url))
            .await
            .map_err(|_| WsError::ConnectionFailed("connect timed out".to_string()))??;
        let (mut write, mut read) = ws_stream.split();

        *self.state.write() = ConnectionState::Handshaking;
        info!("WebSocket connected, awaiting open handshake");

        let mut heartbeat = HeartbeatMonitor::default();
        let mut ticker = heartbeat_ticker(heartbeat.check_interval());

        loop {
            // The open handshake replaces the default ping intervals.
            let check_interval = heartbeat.check_interval();
            if ticker.period() != check_interval {
                ticker = heartbeat_ticker(check_interval);
            }

            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in push channel loop");
                    let leave = EnginePacket::Message(SocketPacket::Disconnect {
                        namespace: self.config.namespace.clone(),
                    }.encode());
                    if let Err(e) = write.send(Message::Text(leave.encode())).await {
                        warn!(?e, "Failed to send namespace disconnect during shutdown");
                    }
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(?e, "Failed to send Close frame during shutdown");
                    }
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if self.handle_frame(&text, &mut write, &mut heartbeat).await? == Flow::Stop {
                                if let Err(e) = write.send(Message::Close(None)).await {
                                    warn!(?e, "Failed to send Close frame after session end");
                                }
                                return Ok(());
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (u16::from(f.code), f.reason.to_string()))
                                .unwrap_or((NORMAL_CLOSE, "Normal close".to_string()));
                            if code == NORMAL_CLOSE {
                                info!(code, %reason, "Push channel closed by server");
                                self.emit(ChannelEvent::Disconnected {
                                    reason: format!("server closed: {reason}"),
                                })
                                .await;
                                return Ok(());
                            }
                            warn!(code, %reason, "Push channel closed by server");
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            error!(?e, "Push channel read error");
                            return Err(e.into());
                        }
                        None => {
                            warn!("Push channel stream ended");
                            self.emit(ChannelEvent::Disconnected {
                                reason: "stream ended".to_string(),
                            })
                            .await;
                            return Ok(());
                        }
                        _ => {}
                    }
                }

                _ = ticker.tick() => {
                    if heartbeat.is_timed_out() {
                        error!(deadline_ms = heartbeat.deadline_ms(), "Push channel ping timeout");
                        return Err(WsError::HeartbeatTimeout);
                    }
                }
            }
        }
    }

    async fn handle_frame(
        &self,
        frame: &str,
        write: &mut WsSink,
        heartbeat: &mut HeartbeatMonitor,
    ) -> WsResult<Flow> {
        let packet = match EnginePacket::decode(frame) {
            Ok(packet) => packet,
            Err(e) => {
                warn!(?e, frame, "Ignoring undecodable frame");
                return Ok(Flow::Continue);
            }
        };

        match packet {
            EnginePacket::Open(handshake) => {
                info!(
                    sid = %handshake.sid,
                    ping_interval_ms = handshake.ping_interval,
                    ping_timeout_ms = handshake.ping_timeout,
                    "Engine.IO session opened"
                );
                heartbeat.configure(handshake.ping_interval, handshake.ping_timeout);
                let join = EnginePacket::Message(SocketPacket::connect(&self.config.namespace).encode());
                write.send(Message::Text(join.encode())).await?;
            }
            EnginePacket::Ping(data) => {
                heartbeat.record_ping();
                write.send(Message::Text(EnginePacket::Pong(data).encode())).await?;
                debug!(pings = heartbeat.pings_received(), "Answered server ping");
            }
            EnginePacket::Message(body) => return self.handle_socket_packet(&body).await,
            EnginePacket::Close => {
                info!("Engine.IO close received");
                self.emit(ChannelEvent::Disconnected {
                    reason: "transport close".to_string(),
                })
                .await;
                return Ok(Flow::Stop);
            }
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
        }

        Ok(Flow::Continue)
    }

    async fn handle_socket_packet(&self, body: &str) -> WsResult<Flow> {
        let packet = match SocketPacket::decode(body) {
            Ok(packet) => packet,
            Err(e) => {
                warn!(?e, body, "Ignoring undecodable socket packet");
                return Ok(Flow::Continue);
            }
        };

        if packet.namespace() != self.config.namespace {
            debug!(namespace = packet.namespace(), "Packet for another namespace");
            return Ok(Flow::Continue);
        }

        match packet {
            SocketPacket::Connect { data, .. } => {
                let sid = data
                    .as_ref()
                    .and_then(|d| d.get("sid"))
                    .and_then(|s| s.as_str())
                    .map(str::to_string);
                *self.state.write() = ConnectionState::Connected;
                info!(sid = ?sid, "Connected to server");
                self.emit(ChannelEvent::Connected { sid }).await;
            }
            SocketPacket::ConnectError { data, .. } => {
                return Err(WsError::ConnectRejected(data.to_string()));
            }
            SocketPacket::Disconnect { .. } => {
                info!("Server disconnected namespace");
                self.emit(ChannelEvent::Disconnected {
                    reason: "server disconnect".to_string(),
                })
                .await;
                return Ok(Flow::Stop);
            }
            SocketPacket::Event { name, payload, .. } => match ChannelEvent::from_event(&name, payload) {
                Ok(event) => self.emit(event).await,
                Err(e) => warn!(?e, event = %name, "Dropping malformed event"),
            },
            SocketPacket::Ack { ack_id, .. } => {
                debug!(ack_id, "Ignoring ack");
            }
        }

        Ok(Flow::Continue)
    }

    async fn emit(&self, event: ChannelEvent) {
        if self.event_tx.send(event).await.is_err() {
            warn!("Event receiver dropped");
        }
    }
}
