use std::sync::Mutex;

use crate::estimator::Estimate;

/// Holds the single most recently published estimate.
///
/// The ingest worker is the only writer; any number of query handlers read
/// concurrently. The mutex guards the whole record, so a reader can never
/// observe fields from two different publishes.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: Mutex<Option<Estimate>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(None),
        }
    }

    /// Replaces the current snapshot with `estimate`.
    pub fn publish(&self, estimate: Estimate) {
        let mut latest = self.latest.lock().expect("snapshot lock poisoned");
        *latest = Some(estimate);
    }

    /// Returns a copy of the current snapshot, or `None` before the first
    /// successful ingest cycle.
    pub fn read(&self) -> Option<Estimate> {
        self.latest.lock().expect("snapshot lock poisoned").clone()
    }
}
