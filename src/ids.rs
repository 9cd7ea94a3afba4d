//! Identifier helpers for event producers.
//!
//! Identifiers stay plain caller-assigned strings; these only save producers
//! from inventing their own scheme.

use uuid::Uuid;

pub fn new_run_id() -> String {
    format!("run-{}", Uuid::new_v4())
}

pub fn new_step_id() -> String {
    format!("step-{}", Uuid::new_v4())
}
