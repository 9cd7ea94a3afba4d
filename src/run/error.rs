use thiserror::Error;

/// Reasons an event is inadmissible for a run.
///
/// Match on the variant, not the message; the payloads are context for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("run already completed")]
    RunAlreadyCompleted,

    #[error("step not found: {step_id}")]
    StepNotFound { step_id: String },

    #[error("max steps exceeded (limit {max_steps})")]
    MaxStepsExceeded { max_steps: u32 },

    #[error("token budget exceeded: {attempted} > {budget}")]
    TokenBudgetExceeded { budget: u64, attempted: u64 },

    #[error("tool not allowed: {tool_name}")]
    ToolNotAllowed { tool_name: String },

    #[error("unknown event")]
    UnknownEvent,
}
