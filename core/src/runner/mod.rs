mod exit;
mod outcome;
mod report;

pub use exit::ExitKind;
pub use outcome::{JobOutcome, Satisfiability, SolveRecord};
pub use report::parse_report;

use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::config::SolverConfig;

/// Runs one solver subprocess per work unit. The child handle and its stdout
/// pipe are owned here for the duration of the job and reaped on every path.
pub struct JobRunner {
    bin: String,
    no_info: String,
    worker_pid: u32,
}

impl JobRunner {
    pub fn new(solver: &SolverConfig, no_info: &str) -> Self {
        Self {
            bin: solver.bin.clone(),
            no_info: no_info.to_string(),
            worker_pid: std::process::id(),
        }
    }

    /// Never fails: every per-unit problem degrades to `SpawnFailed` so the
    /// caller can report it and move on to the next unit.
    pub async fn run(&self, unit: &str) -> JobOutcome {
        let mut child = match Command::new(&self.bin)
            .arg(unit)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(
                    target: "satgrid.runner",
                    unit,
                    solver = %self.bin,
                    error = %e,
                    "failed to spawn solver"
                );
                return JobOutcome::SpawnFailed {
                    unit: unit.to_string(),
                };
            }
        };

        // Drain stdout to end-of-stream before waiting, so a report larger
        // than the pipe buffer cannot deadlock the child.
        let mut raw = Vec::new();
        if let Some(mut pipe) = child.stdout.take() {
            if let Err(e) = pipe.read_to_end(&mut raw).await {
                tracing::warn!(
                    target: "satgrid.runner",
                    unit,
                    error = %e,
                    "failed reading solver output"
                );
                let _ = child.kill().await;
                let _ = child.wait().await;
                return JobOutcome::SpawnFailed {
                    unit: unit.to_string(),
                };
            }
        }

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(
                    target: "satgrid.runner",
                    unit,
                    error = %e,
                    "failed waiting for solver"
                );
                return JobOutcome::SpawnFailed {
                    unit: unit.to_string(),
                };
            }
        };

        match ExitKind::from(status) {
            ExitKind::LaunchFailure(code) => {
                tracing::warn!(
                    target: "satgrid.runner",
                    unit,
                    code,
                    "solver could not be launched"
                );
                JobOutcome::SpawnFailed {
                    unit: unit.to_string(),
                }
            }
            kind => {
                tracing::debug!(
                    target: "satgrid.runner",
                    unit,
                    exit = ?kind,
                    bytes = raw.len(),
                    "solver finished"
                );
                let text = String::from_utf8_lossy(&raw);
                JobOutcome::Solved(parse_report(&text, unit, self.worker_pid, &self.no_info))
            }
        }
    }
}
