use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::WorkerError;
use crate::runner::JobOutcome;

/// Single writer over the result channel. Each record is fully formatted
/// before one `write_all`, and the sink is owned by exactly one drain point,
/// so emitted lines can never interleave.
pub struct ResultSink<W> {
    output: W,
    error_text: String,
}

impl<W: AsyncWrite + Unpin> ResultSink<W> {
    pub fn new(output: W, error_text: &str) -> Self {
        Self {
            output,
            error_text: error_text.to_string(),
        }
    }

    /// Writes exactly one `\n`-terminated line per outcome and flushes it, so
    /// the master sees a unit's record as soon as that unit is done. The
    /// spawn-failure text gets the same newline guarantee as a result line.
    pub async fn emit(&mut self, outcome: &JobOutcome) -> Result<(), WorkerError> {
        let mut line = match outcome {
            JobOutcome::Solved(rec) => format!(
                "{} {} {} {} {} {}",
                rec.unit,
                rec.clauses,
                rec.variables,
                rec.satisfiability,
                rec.cpu_time,
                rec.worker_pid
            ),
            JobOutcome::SpawnFailed { .. } => self.error_text.clone(),
        };
        if !line.ends_with('\n') {
            line.push('\n');
        }

        self.output
            .write_all(line.as_bytes())
            .await
            .map_err(|source| WorkerError::ChannelWrite { source })?;
        self.output
            .flush()
            .await
            .map_err(|source| WorkerError::ChannelWrite { source })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::runner::{Satisfiability, SolveRecord};

    use super::*;

    fn record() -> SolveRecord {
        SolveRecord {
            unit: "a.cnf".to_string(),
            clauses: "20".to_string(),
            variables: "10".to_string(),
            satisfiability: Satisfiability::Sat,
            cpu_time: "0.01".to_string(),
            worker_pid: 99,
        }
    }

    async fn emitted(outcomes: &[JobOutcome]) -> String {
        let mut sink = ResultSink::new(Cursor::new(Vec::new()), "spawn failed");
        for outcome in outcomes {
            sink.emit(outcome).await.unwrap();
        }
        String::from_utf8(sink.output.into_inner()).unwrap()
    }

    #[test]
    fn result_line_field_order() {
        let out = tokio_test::block_on(emitted(&[JobOutcome::Solved(record())]));
        assert_eq!(out, "a.cnf 20 10 SAT 0.01 99\n");
    }

    #[test]
    fn spawn_failure_emits_error_text_with_newline() {
        let out = tokio_test::block_on(emitted(&[JobOutcome::SpawnFailed {
            unit: "a.cnf".to_string(),
        }]));
        assert_eq!(out, "spawn failed\n");
    }

    #[test]
    fn one_line_per_outcome() {
        let out = tokio_test::block_on(emitted(&[
            JobOutcome::Solved(record()),
            JobOutcome::SpawnFailed {
                unit: "b.cnf".to_string(),
            },
            JobOutcome::Solved(record()),
        ]));
        assert_eq!(out.lines().count(), 3);
        assert_eq!(out.lines().nth(1), Some("spawn failed"));
    }
}
