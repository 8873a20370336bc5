use crate::history::HistoryStore;
use crate::storage::{CommandInvocation, CommandResult, SPAWN_FAILURE_EXIT_CODE};
use chrono::Utc;
use std::process::Command;

pub struct CommandRunner;

impl CommandRunner {
    /// Run one external command to completion and capture both streams.
    ///
    /// Never fails: a process that cannot be started is reported as a
    /// result with the sentinel exit code and an explanatory display text.
    /// The caller blocks for the full duration of the process.
    pub fn execute(invocation: &CommandInvocation) -> CommandResult {
        let Some((program, args)) = invocation.arguments.split_first() else {
            return CommandResult::spawn_failure("empty command");
        };

        let output = Command::new(program)
            .args(args)
            .current_dir(&invocation.working_dir)
            .output();

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                // Killed by signal: no exit code, report the sentinel
                let exit_code = output.status.code().unwrap_or(SPAWN_FAILURE_EXIT_CODE);
                CommandResult::completed(stdout, stderr, exit_code)
            }
            Err(err) => CommandResult::spawn_failure(&err.to_string()),
        }
    }

    /// Execute, then log the command to the history store.
    ///
    /// Recording policy: every execution that reached the spawn step is
    /// recorded after completion, non-zero exits included. Attempts that
    /// failed to spawn are not recorded. Recording is best-effort and can
    /// never fail the execution path.
    pub fn execute_and_record(
        invocation: &CommandInvocation,
        store: &mut HistoryStore,
    ) -> CommandResult {
        let result = Self::execute(invocation);
        if result.spawned {
            store.record(&invocation.rendered(), Utc::now());
        }
        result
    }
}
