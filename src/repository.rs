//! Store-backed access to run projections.
//!
//! Composes an [`EventStore`] with the reducer: loading replays history, and
//! recording validates events against the stored projection before anything
//! is persisted.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Result, RunloopError};
use crate::eventstore::EventStore;
use crate::run::{EventType, Run, RunError, RunEvent};

/// Loads and records runs through a shared event store.
///
/// Clones share one write lock, so `record` calls through the same repository
/// never interleave. Writers in other processes are not covered; a durable
/// backend needs its own compare-and-append for that.
#[derive(Clone)]
pub struct RunRepository {
    store: Arc<dyn EventStore>,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for RunRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunRepository")
            .field("store", &"..")
            .finish()
    }
}

impl RunRepository {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Rebuild the current projection of `run_id`.
    ///
    /// Fails with [`RunError::RunNotFound`] when the history is empty or does
    /// not start with a Created event.
    pub async fn load(&self, run_id: &str) -> Result<Run> {
        let events = self.store.load(run_id).await?;
        match events.first() {
            Some(first) if first.event_type() == EventType::Created => {}
            _ => {
                return Err(RunError::RunNotFound {
                    run_id: run_id.to_string(),
                }
                .into())
            }
        }
        let run = Run::replay(&events)?;
        debug!(run_id, events = events.len(), status = %run.status, "replayed run");
        Ok(run)
    }

    /// Validate `events` against `run`, persist them in one append, then
    /// advance `run`.
    ///
    /// `run` must be the current projection of the stored history: a fresh
    /// [`Run::default()`] for a new run, else the result of [`Self::load`] or
    /// an earlier `record`. A new run's first event must be Created, else
    /// [`RunError::RunNotFound`]. A stale `run` fails with
    /// [`RunloopError::Conflict`].
    ///
    /// All-or-nothing: if any check fails, an event is rejected, or the append
    /// fails, nothing is stored and `run` is left as it was.
    pub async fn record(&self, run: &mut Run, events: Vec<RunEvent>) -> Result<()> {
        let Some(first) = events.first() else {
            return Ok(());
        };
        let run_id = if run.id.is_empty() {
            if first.event_type() != EventType::Created {
                return Err(RunError::RunNotFound {
                    run_id: first.run_id().to_string(),
                }
                .into());
            }
            first.run_id().to_string()
        } else {
            run.id.clone()
        };

        let _guard = self.write_lock.lock().await;

        let history = self.store.load(&run_id).await?;
        let stored = Run::replay(&history)?;
        if stored != *run {
            debug!(run_id = %run_id, stored_events = history.len(), "stale run projection");
            return Err(RunloopError::Conflict {
                run_id,
                stored_events: history.len(),
            });
        }

        let mut next = stored;
        for event in &events {
            next.apply(event)?;
        }

        self.store.append(&run_id, events).await?;
        *run = next;
        Ok(())
    }

    pub async fn list_run_ids(&self) -> Result<Vec<String>> {
        Ok(self.store.list_run_ids().await?)
    }
}
