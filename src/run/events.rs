//! Run events: the closed vocabulary of facts recorded about a run.
//!
//! Events are immutable values. Their payloads are private to this crate and
//! can only be built through the named constructors on [`RunEvent`], which fix
//! the field order and make it impossible to, say, build a response without a
//! step reference.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::types::{ModelConfig, ToolDefinition};

/// Discriminator of a [`RunEvent`], as written on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Created,
    LlmCallReq,
    LlmCallRsp,
    ToolCallReq,
    ToolCallRsp,
    Completed,
    Failed,
    /// Decoded from a payload whose `type` this build does not know.
    Unknown,
}

/// An immutable fact about a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    run_id: String,
    payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum EventPayload {
    Created {
        goal: String,
        model_config: ModelConfig,
        #[serde(default)]
        tools: Vec<ToolDefinition>,
        max_steps: u32,
        token_budget: u64,
        created_at: DateTime<Utc>,
    },
    LlmCallReq {
        step_id: String,
        sequence: u64,
        #[serde(default)]
        input: serde_json::Value,
        started_at: DateTime<Utc>,
    },
    LlmCallRsp {
        step_id: String,
        #[serde(default)]
        output: serde_json::Value,
        tokens_used: u64,
        duration: Duration,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    ToolCallReq {
        step_id: String,
        sequence: u64,
        tool_name: String,
        #[serde(default)]
        arguments: serde_json::Value,
        started_at: DateTime<Utc>,
    },
    ToolCallRsp {
        step_id: String,
        tool_name: String,
        #[serde(default)]
        result: serde_json::Value,
        duration: Duration,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Completed,
    Failed {
        error: String,
        failed_at_step_id: String,
    },
    #[serde(other)]
    Unrecognized,
}

impl RunEvent {
    /// The run was created. Must be the first event of a run.
    pub fn created(
        run_id: impl Into<String>,
        goal: impl Into<String>,
        model_config: ModelConfig,
        tools: Vec<ToolDefinition>,
        max_steps: u32,
        token_budget: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            run_id,
            EventPayload::Created {
                goal: goal.into(),
                model_config,
                tools,
                max_steps,
                token_budget,
                created_at,
            },
        )
    }

    /// An LLM call was issued, opening step `step_id`.
    pub fn llm_call_requested(
        run_id: impl Into<String>,
        step_id: impl Into<String>,
        sequence: u64,
        input: serde_json::Value,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            run_id,
            EventPayload::LlmCallReq {
                step_id: step_id.into(),
                sequence,
                input,
                started_at,
            },
        )
    }

    /// The LLM call for `step_id` returned. A present `error` marks the step failed.
    pub fn llm_call_responded(
        run_id: impl Into<String>,
        step_id: impl Into<String>,
        output: serde_json::Value,
        tokens_used: u64,
        duration: Duration,
        error: Option<String>,
    ) -> Self {
        Self::new(
            run_id,
            EventPayload::LlmCallRsp {
                step_id: step_id.into(),
                output,
                tokens_used,
                duration,
                error: non_empty(error),
            },
        )
    }

    /// A tool call was issued, opening step `step_id`.
    pub fn tool_call_requested(
        run_id: impl Into<String>,
        step_id: impl Into<String>,
        sequence: u64,
        tool_name: impl Into<String>,
        arguments: serde_json::Value,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            run_id,
            EventPayload::ToolCallReq {
                step_id: step_id.into(),
                sequence,
                tool_name: tool_name.into(),
                arguments,
                started_at,
            },
        )
    }

    /// The tool call for `step_id` returned. A present `error` marks the step failed.
    pub fn tool_call_responded(
        run_id: impl Into<String>,
        step_id: impl Into<String>,
        tool_name: impl Into<String>,
        result: serde_json::Value,
        duration: Duration,
        error: Option<String>,
    ) -> Self {
        Self::new(
            run_id,
            EventPayload::ToolCallRsp {
                step_id: step_id.into(),
                tool_name: tool_name.into(),
                result,
                duration,
                error: non_empty(error),
            },
        )
    }

    /// The run finished successfully.
    pub fn completed(run_id: impl Into<String>) -> Self {
        Self::new(run_id, EventPayload::Completed)
    }

    /// The run failed while `failed_at_step_id` was active.
    pub fn failed(
        run_id: impl Into<String>,
        error: impl Into<String>,
        failed_at_step_id: impl Into<String>,
    ) -> Self {
        Self::new(
            run_id,
            EventPayload::Failed {
                error: error.into(),
                failed_at_step_id: failed_at_step_id.into(),
            },
        )
    }

    fn new(run_id: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            run_id: run_id.into(),
            payload,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn event_type(&self) -> EventType {
        match &self.payload {
            EventPayload::Created { .. } => EventType::Created,
            EventPayload::LlmCallReq { .. } => EventType::LlmCallReq,
            EventPayload::LlmCallRsp { .. } => EventType::LlmCallRsp,
            EventPayload::ToolCallReq { .. } => EventType::ToolCallReq,
            EventPayload::ToolCallRsp { .. } => EventType::ToolCallRsp,
            EventPayload::Completed => EventType::Completed,
            EventPayload::Failed { .. } => EventType::Failed,
            EventPayload::Unrecognized => EventType::Unknown,
        }
    }

    /// Step the event opens or answers, if any.
    pub fn step_id(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::LlmCallReq { step_id, .. }
            | EventPayload::LlmCallRsp { step_id, .. }
            | EventPayload::ToolCallReq { step_id, .. }
            | EventPayload::ToolCallRsp { step_id, .. } => Some(step_id),
            _ => None,
        }
    }

    pub(crate) fn payload(&self) -> &EventPayload {
        &self.payload
    }
}

fn non_empty(error: Option<String>) -> Option<String> {
    error.filter(|e| !e.is_empty())
}
