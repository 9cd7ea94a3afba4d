//! Shared event fixtures.
#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use runloop::run::{ModelConfig, Run, RunEvent, ToolDefinition};

pub const RUN_ID: &str = "run-1";

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
}

pub fn created(max_steps: u32, token_budget: u64) -> RunEvent {
    RunEvent::created(
        RUN_ID,
        "solve a task",
        ModelConfig::new("openai", "gpt-4", 0.5),
        vec![ToolDefinition::new("bash", "run commands")],
        max_steps,
        token_budget,
        fixed_time(),
    )
}

pub fn llm_req(step_id: &str, sequence: u64) -> RunEvent {
    RunEvent::llm_call_requested(
        RUN_ID,
        step_id,
        sequence,
        json!({"prompt": "hello"}),
        fixed_time(),
    )
}

pub fn llm_rsp(step_id: &str, tokens_used: u64) -> RunEvent {
    RunEvent::llm_call_responded(
        RUN_ID,
        step_id,
        json!({"response": "world"}),
        tokens_used,
        Duration::from_millis(500),
        None,
    )
}

pub fn tool_req(step_id: &str, sequence: u64) -> RunEvent {
    RunEvent::tool_call_requested(
        RUN_ID,
        step_id,
        sequence,
        "bash",
        json!({"cmd": "ls"}),
        fixed_time(),
    )
}

pub fn tool_rsp(step_id: &str) -> RunEvent {
    RunEvent::tool_call_responded(
        RUN_ID,
        step_id,
        "bash",
        json!({"output": "file.txt"}),
        Duration::from_millis(200),
        None,
    )
}

/// Fold `events` into a fresh run, panicking on the first rejection.
pub fn run_from(events: &[RunEvent]) -> Run {
    Run::replay(events).expect("fixture history should fold cleanly")
}
