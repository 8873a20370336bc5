use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shown instead of an empty panel when a command succeeds silently.
pub const NO_OUTPUT_PLACEHOLDER: &str = "(command produced no output)";

/// Exit code reported when the process never started.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = -1;

/// One request to run an external command.
///
/// Arguments are kept as a discrete vector and handed to the OS as-is;
/// nothing here goes through a shell.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub arguments: Vec<String>, // Command followed by its arguments, must be non-empty
    pub working_dir: PathBuf,
}

impl CommandInvocation {
    pub fn new(arguments: Vec<String>) -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            arguments,
            working_dir,
        }
    }

    pub fn with_working_dir(arguments: Vec<String>, working_dir: PathBuf) -> Self {
        Self {
            arguments,
            working_dir,
        }
    }

    /// String rendering used for the history log.
    pub fn rendered(&self) -> String {
        self.arguments.join(" ")
    }
}

/// Outcome of a single command execution, ready for display.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub display_text: String,
    /// False when the process could not be started at all.
    pub spawned: bool,
}

impl CommandResult {
    /// Result for a process that ran to completion, with any exit code.
    pub fn completed(stdout: String, stderr: String, exit_code: i32) -> Self {
        let combined = format!("{}{}", stdout, stderr);
        let display_text = if exit_code != 0 {
            format!("Error (exit code {}):\n{}", exit_code, combined)
        } else if combined.is_empty() {
            NO_OUTPUT_PLACEHOLDER.to_string()
        } else {
            combined
        };

        Self {
            stdout,
            stderr,
            exit_code,
            display_text,
            spawned: true,
        }
    }

    /// Result for a process that never started (missing binary, permissions).
    pub fn spawn_failure(description: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: SPAWN_FAILURE_EXIT_CODE,
            display_text: format!("Error: {}", description),
            spawned: false,
        }
    }
}

/// One row of the command history table.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryRecord {
    pub command: String,          // Rendered argument vector
    pub timestamp: DateTime<Utc>, // Completion time of the execution
}
