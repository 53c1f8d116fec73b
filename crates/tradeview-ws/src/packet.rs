//! Engine.IO / Socket.IO text framing.
//!
//! Every WebSocket text frame is one Engine.IO packet: a type digit followed
//! by its data. Engine.IO `message` packets (`4`) carry a Socket.IO packet:
//!
//! ```text
//! <type>[<namespace>,][<ack id>][<json>]
//! 42["data_update",{...}]        event on "/"
//! 40/admin,{"sid":"..."}         connect ack on "/admin"
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::{WsError, WsResult};

/// Default Socket.IO namespace.
pub const ROOT_NAMESPACE: &str = "/";

/// Payload of the Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Server ping period (ms).
    pub ping_interval: u64,
    /// Grace period after a missed ping (ms).
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

/// Engine.IO packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping(String),
    Pong(String),
    /// Socket.IO packet body (without the leading `4`).
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> WsResult<Self> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| WsError::Protocol("empty frame".to_string()))?;
        let data = chars.as_str();

        Ok(match kind {
            '0' => Self::Open(serde_json::from_str(data)?),
            '1' => Self::Close,
            '2' => Self::Ping(data.to_string()),
            '3' => Self::Pong(data.to_string()),
            '4' => Self::Message(data.to_string()),
            '5' => Self::Upgrade,
            '6' => Self::Noop,
            other => {
                return Err(WsError::Protocol(format!(
                    "unknown engine packet type {other:?}"
                )))
            }
        })
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(_) => "0".to_string(),
            Self::Close => "1".to_string(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(body) => format!("4{body}"),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }
}

/// Socket.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        payload: Value,
    },
    Ack {
        namespace: String,
        ack_id: u64,
        data: Value,
    },
    ConnectError {
        namespace: String,
        data: Value,
    },
}

impl SocketPacket {
    /// Namespace connect request.
    pub fn connect(namespace: &str) -> Self {
        Self::Connect {
            namespace: namespace.to_string(),
            data: None,
        }
    }

    /// Server-side event with a single argument.
    pub fn event(namespace: &str, name: &str, payload: Value) -> Self {
        Self::Event {
            namespace: namespace.to_string(),
            ack_id: None,
            name: name.to_string(),
            payload,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::Connect { namespace, .. }
            | Self::Disconnect { namespace }
            | Self::Event { namespace, .. }
            | Self::Ack { namespace, .. }
            | Self::ConnectError { namespace, .. } => namespace,
        }
    }

    pub fn decode(body: &str) -> WsResult<Self> {
        let mut chars = body.chars();
        let kind = chars
            .next()
            .ok_or_else(|| WsError::Protocol("empty socket packet".to_string()))?;
        if matches!(kind, '5' | '6') {
            return Err(WsError::Protocol(
                "binary packets are not supported".to_string(),
            ));
        }
        let rest = chars.as_str();

        let (namespace, rest) = split_namespace(rest);
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let (ack_digits, json) = rest.split_at(digits);
        let ack_id = if ack_digits.is_empty() {
            None
        } else {
            Some(
                ack_digits
                    .parse::<u64>()
                    .map_err(|e| WsError::Protocol(format!("bad ack id: {e}")))?,
            )
        };
        let data = if json.is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(json)?)
        };

        match kind {
            '0' => Ok(Self::Connect { namespace, data }),
            '1' => Ok(Self::Disconnect { namespace }),
            '2' => {
                let (name, payload) = split_event(data)?;
                Ok(Self::Event {
                    namespace,
                    ack_id,
                    name,
                    payload,
                })
            }
            '3' => Ok(Self::Ack {
                namespace,
                ack_id: ack_id
                    .ok_or_else(|| WsError::Protocol("ack without id".to_string()))?,
                data: data.unwrap_or(Value::Null),
            }),
            '4' => Ok(Self::ConnectError {
                namespace,
                data: data.unwrap_or(Value::Null),
            }),
            other => Err(WsError::Protocol(format!(
                "unknown socket packet type {other:?}"
            ))),
        }
    }

    pub fn encode(&self) -> String {
        let prefix = |kind: char, namespace: &str| {
            if namespace == ROOT_NAMESPACE {
                kind.to_string()
            } else {
                format!("{kind}{namespace},")
            }
        };

        match self {
            Self::Connect { namespace, data } => {
                let mut out = prefix('0', namespace);
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
                out
            }
            Self::Disconnect { namespace } => prefix('1', namespace),
            Self::Event {
                namespace,
                ack_id,
                name,
                payload,
            } => {
                let mut out = prefix('2', namespace);
                if let Some(id) = ack_id {
                    out.push_str(&id.to_string());
                }
                let args = Value::Array(vec![Value::from(name.as_str()), payload.clone()]);
                out.push_str(&args.to_string());
                out
            }
            Self::Ack {
                namespace,
                ack_id,
                data,
            } => format!("{}{ack_id}{data}", prefix('3', namespace)),
            Self::ConnectError { namespace, data } => {
                format!("{}{data}", prefix('4', namespace))
            }
        }
    }
}

fn split_namespace(rest: &str) -> (String, &str) {
    if !rest.starts_with('/') {
        return (ROOT_NAMESPACE.to_string(), rest);
    }
    match rest.find(',') {
        Some(idx) => (rest[..idx].to_string(), &rest[idx + 1..]),
        None => (rest.to_string(), ""),
    }
}

fn split_event(data: Option<Value>) -> WsResult<(String, Value)> {
    let Some(Value::Array(mut args)) = data else {
        return Err(WsError::Protocol("event data must be an array".to_string()));
    };
    if args.is_empty() {
        return Err(WsError::Protocol("event without a name".to_string()));
    }
    let name = match args.remove(0) {
        Value::String(name) => name,
        other => {
            return Err(WsError::Protocol(format!(
                "event name must be a string, got {other}"
            )))
        }
    };
    let payload = if args.is_empty() {
        Value::Null
    } else {
        args.swap_remove(0)
    };
    Ok((name, payload))
}
