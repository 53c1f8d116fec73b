//! Shared page state.
//!
//! The application loop is the only writer; HTTP handlers take read locks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tradeview_view::{Document, RegionIds};

use crate::types::RegionsSnapshot;

/// Rendered page shared between the update loop and the HTTP server.
#[derive(Clone)]
pub struct DashboardState {
    document: Arc<RwLock<Document>>,
    regions: RegionIds,
    /// Applied update count.
    revision: Arc<AtomicU64>,
    /// Last update time (Unix milliseconds).
    updated_at_ms: Arc<RwLock<Option<i64>>>,
}

impl DashboardState {
    pub fn new(document: Document, regions: RegionIds) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
            regions,
            revision: Arc::new(AtomicU64::new(0)),
            updated_at_ms: Arc::new(RwLock::new(None)),
        }
    }

    /// Start from the skeleton page for `regions`.
    pub fn with_skeleton(regions: RegionIds) -> Self {
        Self::new(Document::skeleton(&regions), regions)
    }

    pub fn regions(&self) -> &RegionIds {
        &self.regions
    }

    /// Run `f` with write access to the document and count it as one update.
    pub fn update<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let result = {
            let mut document = self.document.write();
            f(&mut document)
        };
        self.revision.fetch_add(1, Ordering::AcqRel);
        *self.updated_at_ms.write() = Some(Utc::now().timestamp_millis());
        result
    }

    /// Run `f` with read access to the document.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.document.read())
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn render_html(&self) -> String {
        self.read(Document::to_html)
    }

    pub fn collect_regions(&self) -> RegionsSnapshot {
        let document = self.document.read();
        let mut regions = Map::new();
        for (_, id) in self.regions.text_regions() {
            let text = document.text_of(id).map_or(Value::Null, Value::String);
            regions.insert(id.to_string(), text);
        }

        RegionsSnapshot {
            revision: self.revision(),
            updated_at_ms: *self.updated_at_ms.read(),
            regions,
        }
    }
}
