//! Error types for runloop.

use thiserror::Error;

use crate::eventstore::StoreError;
use crate::run::RunError;

/// Broad error category for routing caller-side recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// An event was inadmissible for the run's state.
    Domain,
    Storage,
    Timeout,
    Canceled,
    /// The caller's projection no longer matches the stored history.
    Conflict,
}

/// Primary error type for runloop operations that touch both layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunloopError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Stale projection for run {run_id} ({stored_events} events stored)")]
    Conflict { run_id: String, stored_events: usize },
}

impl RunloopError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Run(_) => ErrorCategory::Domain,
            Self::Store(StoreError::Timeout(_)) => ErrorCategory::Timeout,
            Self::Store(StoreError::Canceled) => ErrorCategory::Canceled,
            Self::Store(_) => ErrorCategory::Storage,
            Self::Conflict { .. } => ErrorCategory::Conflict,
        }
    }

    /// Whether the caller may retry the same operation.
    ///
    /// A rejected event stays rejected and a conflict needs a reload first;
    /// only transient storage failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Io(_) | StoreError::Timeout(_) | StoreError::Backend(_))
        )
    }

    /// The domain error, if this is one.
    pub fn as_run_error(&self) -> Option<&RunError> {
        match self {
            Self::Run(error) => Some(error),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RunloopError>;
