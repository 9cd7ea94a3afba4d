//! The reducer: folds one event into a run, enforcing lifecycle invariants.
//!
//! Validation always checks terminality first and domain limits second, and
//! every check runs before the first write, so a rejected event leaves the
//! run exactly as it was.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::RunError;
use super::events::{EventPayload, RunEvent};
use super::types::{Run, RunStatus, Step, StepStatus, StepType};

impl Run {
    /// Fold `event` into this run.
    ///
    /// Not internally synchronized: callers sharing a run across tasks must
    /// serialize calls themselves.
    pub fn apply(&mut self, event: &RunEvent) -> Result<(), RunError> {
        let result = self.fold(event);
        if let Err(ref error) = result {
            debug!(
                run_id = %event.run_id(),
                event_type = %event.event_type(),
                status = %self.status,
                error = %error,
                "run event rejected"
            );
        }
        result
    }

    /// Rebuild a run from its full history, stopping at the first rejected event.
    pub fn replay<'a, I>(events: I) -> Result<Run, RunError>
    where
        I: IntoIterator<Item = &'a RunEvent>,
    {
        let mut run = Run::default();
        for event in events {
            run.apply(event)?;
        }
        Ok(run)
    }

    fn fold(&mut self, event: &RunEvent) -> Result<(), RunError> {
        if self.is_terminal() {
            return Err(RunError::RunAlreadyCompleted);
        }

        match event.payload() {
            EventPayload::Created {
                goal,
                model_config,
                tools,
                max_steps,
                token_budget,
                created_at,
            } => {
                self.id = event.run_id().to_string();
                self.goal = goal.clone();
                self.status = RunStatus::Pending;
                self.model_config = model_config.clone();
                self.tools = tools.clone();
                self.max_steps = *max_steps;
                self.token_budget = *token_budget;
                self.created_at = Some(*created_at);
                Ok(())
            }
            EventPayload::LlmCallReq {
                step_id,
                sequence,
                input,
                started_at,
            } => {
                self.ensure_step_capacity()?;
                self.open_step(Step {
                    input: input.clone(),
                    ..started_step(step_id, *sequence, StepType::LlmCall, *started_at)
                });
                Ok(())
            }
            EventPayload::ToolCallReq {
                step_id,
                sequence,
                tool_name,
                arguments,
                started_at,
            } => {
                self.ensure_step_capacity()?;
                self.open_step(Step {
                    tool_name: tool_name.clone(),
                    input: arguments.clone(),
                    ..started_step(step_id, *sequence, StepType::ToolCall, *started_at)
                });
                Ok(())
            }
            EventPayload::LlmCallRsp {
                step_id,
                output,
                tokens_used,
                duration,
                error,
            } => {
                let index = self.step_index(step_id)?;
                let attempted = self.total_tokens_used.saturating_add(*tokens_used);
                if self.token_budget > 0 && attempted > self.token_budget {
                    return Err(RunError::TokenBudgetExceeded {
                        budget: self.token_budget,
                        attempted,
                    });
                }

                self.total_tokens_used = attempted;
                let step = &mut self.steps[index];
                step.tokens_used = *tokens_used;
                finish_step(step, output, *duration, error.as_deref());
                Ok(())
            }
            EventPayload::ToolCallRsp {
                step_id,
                tool_name,
                result,
                duration,
                error,
            } => {
                let index = self.step_index(step_id)?;
                let step = &mut self.steps[index];
                step.responded_tool_name = Some(tool_name.clone());
                finish_step(step, result, *duration, error.as_deref());
                Ok(())
            }
            EventPayload::Completed => {
                self.status = RunStatus::Completed;
                Ok(())
            }
            EventPayload::Failed {
                error,
                failed_at_step_id,
            } => {
                self.status = RunStatus::Failed;
                self.error = error.clone();
                self.failed_at_step_id = failed_at_step_id.clone();
                Ok(())
            }
            EventPayload::Unrecognized => Err(RunError::UnknownEvent),
        }
    }

    fn ensure_step_capacity(&self) -> Result<(), RunError> {
        // Counted when a step opens, not when it finishes.
        if self.max_steps > 0 && self.steps.len() >= self.max_steps as usize {
            return Err(RunError::MaxStepsExceeded {
                max_steps: self.max_steps,
            });
        }
        Ok(())
    }

    fn open_step(&mut self, step: Step) {
        self.status = RunStatus::Running;
        self.steps.push(step);
    }

    fn step_index(&self, step_id: &str) -> Result<usize, RunError> {
        self.steps
            .iter()
            .position(|step| step.id == step_id)
            .ok_or_else(|| RunError::StepNotFound {
                step_id: step_id.to_string(),
            })
    }
}

fn started_step(
    step_id: &str,
    sequence: u64,
    step_type: StepType,
    started_at: DateTime<Utc>,
) -> Step {
    Step {
        id: step_id.to_string(),
        sequence,
        step_type,
        status: StepStatus::Started,
        tool_name: String::new(),
        input: serde_json::Value::Null,
        output: None,
        responded_tool_name: None,
        started_at,
        completed_at: None,
        duration: Default::default(),
        tokens_used: 0,
        error: String::new(),
    }
}

fn finish_step(
    step: &mut Step,
    output: &serde_json::Value,
    duration: std::time::Duration,
    error: Option<&str>,
) {
    step.output = Some(output.clone());
    step.duration = duration;
    step.completed_at = chrono::Duration::from_std(duration)
        .ok()
        .and_then(|elapsed| step.started_at.checked_add_signed(elapsed));
    match error {
        Some(error) => {
            step.error = error.to_string();
            step.status = StepStatus::Failed;
        }
        None => step.status = StepStatus::Completed,
    }
}
