//! Event-sourced lifecycle tracking for autonomous agent runs.
//!
//! A run's state is never written directly. Producers append immutable
//! [`RunEvent`](run::RunEvent)s to an [`EventStore`](eventstore::EventStore)
//! and rebuild the [`Run`](run::Run) projection by folding them through
//! [`Run::apply`](run::Run::apply), which enforces the lifecycle invariants.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use chrono::Utc;
//! use runloop::prelude::*;
//! use serde_json::json;
//!
//! # async fn example() -> runloop::error::Result<()> {
//! let repo = RunRepository::new(Arc::new(MemoryEventStore::default()));
//! let mut run = Run::default();
//!
//! repo.record(&mut run, vec![
//!     RunEvent::created("run-1", "say hi", ModelConfig::default(), vec![], 10, 1000, Utc::now()),
//!     RunEvent::llm_call_requested("run-1", "step-1", 1, json!({"prompt": "hi"}), Utc::now()),
//!     RunEvent::llm_call_responded("run-1", "step-1", json!({"text": "hello"}), 42, Duration::from_millis(80), None),
//!     RunEvent::completed("run-1"),
//! ]).await?;
//!
//! let reloaded = repo.load("run-1").await?;
//! assert_eq!(reloaded, run);
//! assert_eq!(reloaded.total_tokens_used, 42);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod eventstore;
pub mod ids;
pub mod prelude;
pub mod repository;
pub mod run;

#[cfg(feature = "cli")]
pub mod cli;
