//! CLI entry point for runloop.

use clap::{Parser, Subcommand};

/// runloop CLI
#[derive(Parser, Debug)]
#[command(name = "runloop", about = "Event-sourced agent runs")]
pub struct Cli {
    /// Defaults to `version` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the runloop version
    Version,
}

impl Cli {
    /// The subcommand to run, applying the default.
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Version)
    }
}

/// Text printed by `runloop version`.
pub fn version_line() -> String {
    format!("runloop {}", env!("CARGO_PKG_VERSION"))
}
