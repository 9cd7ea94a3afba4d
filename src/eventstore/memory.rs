//! In-memory reference store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::trace;

use super::{EventStore, StoreError, StoreOptions};
use crate::run::RunEvent;

/// Event store backed by a map behind a single reader/writer lock.
///
/// One lock covers every run: loads and listings run concurrently, an append
/// excludes everything else. That caps write throughput across runs but not
/// correctness. Every operation completes synchronously inside the future, so
/// neither cancellation nor a deadline can interrupt one midway, and none of
/// them can fail.
///
/// Cloning shares the underlying log.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    options: StoreOptions,
    events: Arc<RwLock<HashMap<String, Vec<RunEvent>>>>,
}

impl MemoryEventStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            events: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<RunEvent>>> {
        // A panicking writer can only have completed or skipped its extend,
        // so the map is still consistent.
        self.events
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<RunEvent>>> {
        self.events
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, run_id: &str, events: Vec<RunEvent>) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }
        let count = events.len();
        let mut log = self.write();
        let history = log.entry(run_id.to_string()).or_default();
        history.extend(events);
        trace!(run_id, count, total = history.len(), "appended run events");
        Ok(())
    }

    async fn load(&self, run_id: &str) -> Result<Vec<RunEvent>, StoreError> {
        Ok(self.read().get(run_id).cloned().unwrap_or_default())
    }

    async fn list_run_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read()
            .iter()
            .filter(|(_, history)| !history.is_empty())
            .map(|(run_id, _)| run_id.clone())
            .collect())
    }
}
