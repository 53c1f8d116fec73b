//! Dashboard API types.

use serde::Serialize;
use serde_json::{Map, Value};

/// Text of the single-text regions (`GET /api/regions`).
#[derive(Debug, Clone, Serialize)]
pub struct RegionsSnapshot {
    /// Number of push updates applied so far.
    pub revision: u64,
    /// When the last update was applied (Unix milliseconds).
    pub updated_at_ms: Option<i64>,
    /// Region id -> text, in page order.
    pub regions: Map<String, Value>,
}
