// src/storage/memory.rs
use crate::models::server::ServerRecord;
use log::debug;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Arc<Vec<ServerRecord>>,
    /// Unix seconds of the fetch that produced `records`.
    pub fetched_at: Option<u64>,
}

/// Last good server list plus the bookkeeping that keeps slow fetches from
/// overwriting newer ones.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshot: RwLock<Snapshot>,
    latest_request: AtomicU64,
    last_error: RwLock<Option<String>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the id for a new fetch. Any earlier fetch still in flight is
    /// superseded from this point on.
    pub fn begin_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest_request(&self) -> u64 {
        self.latest_request.load(Ordering::SeqCst)
    }

    /// Replaces the snapshot if `request_id` is still the newest request.
    /// Returns false when the result was discarded.
    pub fn commit(&self, request_id: u64, records: Vec<ServerRecord>) -> bool {
        let mut snapshot = self.snapshot.write();
        if request_id != self.latest_request() {
            debug!(
                "Discarding result of request {} (latest is {})",
                request_id,
                self.latest_request()
            );
            return false;
        }

        *snapshot = Snapshot {
            records: Arc::new(records),
            fetched_at: Some(unix_now()),
        };
        *self.last_error.write() = None;
        true
    }

    pub fn record_failure(&self, request_id: u64, message: String) {
        if request_id == self.latest_request() {
            *self.last_error.write() = Some(message);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    pub fn records(&self) -> Arc<Vec<ServerRecord>> {
        Arc::clone(&self.snapshot.read().records)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
