//! Run aggregate types: the projection built by folding run events.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Run lifecycle status.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// Completed and Failed admit no further events.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Kind of work a step performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepType {
    LlmCall,
    ToolCall,
}

/// Step lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepStatus {
    Started,
    Completed,
    Failed,
}

/// Model the run was configured with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
}

impl ModelConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            temperature,
        }
    }
}

/// A tool the run is allowed to invoke.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's input.
    #[serde(default)]
    pub input_schema: serde_json::Value,
    #[serde(default)]
    pub endpoint: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::Value::Null,
            endpoint: String::new(),
        }
    }

    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// One LLM call or tool call within a run, tracked as a request/response pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub id: String,
    pub sequence: u64,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub status: StepStatus,
    /// Empty for LLM calls.
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub input: serde_json::Value,
    /// Absent until the response is folded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Tool name echoed back on the tool response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_tool_name: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Duration,
    /// LLM calls only.
    #[serde(default)]
    pub tokens_used: u64,
    #[serde(default)]
    pub error: String,
}

/// The aggregate root: one agent execution from goal to terminal outcome.
///
/// A `Run` starts as [`Run::default()`] and is only ever changed by
/// [`Run::apply`]. Fields are public for reading; mutating them directly
/// bypasses every invariant the reducer enforces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub id: String,
    pub goal: String,
    pub status: RunStatus,
    pub model_config: ModelConfig,
    pub tools: Vec<ToolDefinition>,
    pub steps: Vec<Step>,
    /// 0 means unlimited.
    pub max_steps: u32,
    /// 0 means unlimited.
    pub token_budget: u64,
    pub total_tokens_used: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub failed_at_step_id: String,
}
