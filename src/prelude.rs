//! Convenience re-exports for common use.

pub use crate::error::{Result, RunloopError};
pub use crate::eventstore::{EventStore, MemoryEventStore, StoreError, StoreOptions};
pub use crate::repository::RunRepository;
pub use crate::run::{
    EventType, ModelConfig, Run, RunError, RunEvent, RunStatus, Step, StepStatus, StepType,
    ToolDefinition,
};
