//! Append-only, per-run event log.
//!
//! The store is schema-agnostic: it never interprets events and never checks
//! them against run invariants. Folding a loaded history through
//! [`Run::apply`](crate::run::Run::apply) is the caller's job.

pub mod memory;
pub mod options;

pub use memory::MemoryEventStore;
pub use options::StoreOptions;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::run::RunEvent;

/// Failures a storage backend may report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Operation canceled")]
    Canceled,

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Storage abstraction for run histories.
///
/// Contract every backend must honor:
/// - `append` records all given events after any already present, in order,
///   or records none of them.
/// - Appends to the same run are serialized; appends to different runs must
///   not wait on each other longer than the backend needs for correctness.
/// - `load` returns an owned copy in append order, and an empty history for
///   an unknown run rather than an error.
///
/// Dropping a returned future cancels the call. Backends that do real I/O
/// must also observe [`StoreOptions::cancel`].
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append(&self, run_id: &str, events: Vec<RunEvent>) -> Result<(), StoreError>;
    async fn load(&self, run_id: &str) -> Result<Vec<RunEvent>, StoreError>;
    /// Every run with at least one stored event, in no particular order.
    async fn list_run_ids(&self) -> Result<Vec<String>, StoreError>;
}

/// Bound a store call by a deadline.
pub async fn with_deadline<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(millis(duration))),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Abandon a store call once `cancel` fires.
pub async fn with_cancel<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StoreError::Canceled),
        result = future => result,
    }
}
