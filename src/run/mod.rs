//! Run aggregate: types, events, and the reducer that folds one into the other.

mod apply;
pub mod error;
pub mod events;
pub mod types;

pub use error::RunError;
pub use events::{EventType, RunEvent};
pub use types::*;

impl Run {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn find_step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    /// Tokens left before the budget is hit, `None` when unlimited.
    pub fn remaining_tokens(&self) -> Option<u64> {
        (self.token_budget > 0).then(|| self.token_budget.saturating_sub(self.total_tokens_used))
    }

    /// Steps that may still be opened, `None` when unlimited.
    pub fn remaining_steps(&self) -> Option<u32> {
        (self.max_steps > 0).then(|| {
            let used = u32::try_from(self.steps.len()).unwrap_or(u32::MAX);
            self.max_steps.saturating_sub(used)
        })
    }

    /// Check `tool_name` against the run's allow-list.
    ///
    /// For orchestrators deciding whether to issue a tool call; [`Run::apply`]
    /// never calls this.
    pub fn check_tool_allowed(&self, tool_name: &str) -> Result<(), RunError> {
        if self.tools.iter().any(|tool| tool.name == tool_name) {
            Ok(())
        } else {
            Err(RunError::ToolNotAllowed {
                tool_name: tool_name.to_string(),
            })
        }
    }
}
