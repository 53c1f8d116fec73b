//! Mock Socket.IO server for integration tests.
//!
//! Speaks just enough Engine.IO v4 over a WebSocket to:
//! - Send the open handshake
//! - Answer the namespace connect
//! - Play a script of frames, then end the session as configured
//! - Record received frames

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub const OPEN_FRAME: &str =
    r#"0{"sid":"mock-sid","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

const CONNECT_ACK: &str = r#"40{"sid":"mock-socket"}"#;

/// How the server ends a session once the script has been played.
#[derive(Debug, Clone)]
pub enum Ending {
    /// Ping, wait for the pong, then leave the namespace (`41`).
    PingThenLeave,
    /// Engine.IO close packet (`1`).
    EngineClose,
    /// WebSocket close frame with code 1000.
    NormalClose,
    /// Send `frame` every `every`, never ping.
    Flood { frame: String, every: Duration },
    /// Keep the socket open and stay silent.
    Idle,
}

/// One scripted session.
#[derive(Debug, Clone)]
pub struct Session {
    pub open: String,
    /// Reply to the client's `40`.
    pub connect_reply: String,
    pub script: Vec<String>,
    pub ending: Ending,
}

impl Session {
    pub fn scripted(script: Vec<String>) -> Self {
        Self {
            open: OPEN_FRAME.to_string(),
            connect_reply: CONNECT_ACK.to_string(),
            script,
            ending: Ending::PingThenLeave,
        }
    }

    pub fn with_open(mut self, open: impl Into<String>) -> Self {
        self.open = open.into();
        self
    }

    pub fn with_connect_reply(mut self, reply: impl Into<String>) -> Self {
        self.connect_reply = reply.into();
        self
    }

    pub fn with_ending(mut self, ending: Ending) -> Self {
        self.ending = ending;
        self
    }
}

/// A scripted Socket.IO server for testing.
pub struct MockSocketIoServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockSocketIoServer {
    /// Start on an available port. Every connection gets `script` after
    /// the namespace connect is acknowledged.
    pub async fn start(script: Vec<String>) -> Self {
        Self::start_session(Session::scripted(script)).await
    }

    /// Start on an available port, playing `session` on every connection.
    pub async fn start_session(session: Session) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let received_clone = received.clone();
        let session = Arc::new(session);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        tokio::spawn(handle_connection(stream, session.clone(), received_clone.clone()));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            received,
        }
    }

    /// Socket.IO WebSocket endpoint.
    pub fn url(&self) -> String {
        format!("ws://{}/socket.io/?EIO=4&transport=websocket", self.addr)
    }

    /// Frames received from the client, in order.
    pub async fn received_frames(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// `42["name",payload]`
pub fn event_frame(name: &str, payload: serde_json::Value) -> String {
    format!("42{}", serde_json::json!([name, payload]))
}

async fn handle_connection(
    stream: TcpStream,
    session: Arc<Session>,
    received: Arc<Mutex<Vec<String>>>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    if write.send(Message::Text(session.open.clone())).await.is_err() {
        return;
    }

    let mut scripted = false;
    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                received.lock().await.push(text.clone());

                if text == "40" && !scripted {
                    scripted = true;
                    let _ = write.send(Message::Text(session.connect_reply.clone())).await;
                    for frame in &session.script {
                        let _ = write.send(Message::Text(frame.clone())).await;
                    }
                    match &session.ending {
                        Ending::PingThenLeave => {
                            let _ = write.send(Message::Text("2".to_string())).await;
                        }
                        Ending::EngineClose => {
                            let _ = write.send(Message::Text("1".to_string())).await;
                        }
                        Ending::NormalClose => {
                            let _ = write
                                .send(Message::Close(Some(CloseFrame {
                                    code: CloseCode::Normal,
                                    reason: "session over".into(),
                                })))
                                .await;
                        }
                        Ending::Flood { frame, every } => {
                            // Stops once the client has gone away.
                            loop {
                                tokio::time::sleep(*every).await;
                                if write.send(Message::Text(frame.clone())).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Ending::Idle => {}
                    }
                } else if text == "3" && matches!(session.ending, Ending::PingThenLeave) {
                    // Heartbeat answered, end the session.
                    let _ = write.send(Message::Text("41".to_string())).await;
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = write.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockSocketIoServer::start(Vec::new()).await;
        assert!(server.url().starts_with("ws://127.0.0.1:"));
        server.shutdown().await;
    }

    #[test]
    fn test_event_frame() {
        assert_eq!(
            event_frame("trade_update", serde_json::json!({"symbol": "AAPL"})),
            r#"42["trade_update",{"symbol":"AAPL"}]"#
        );
    }
}
