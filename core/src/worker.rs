use futures::{stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::WorkerConfig;
use crate::emit::ResultSink;
use crate::error::WorkerError;
use crate::protocol::{ControlMessage, ControlReader};
use crate::runner::JobRunner;

/// The worker state machine: await a batch, run its units, emit one record
/// per unit in submission order, repeat until the terminate sentinel or the
/// control channel closes.
pub struct Worker<R, W> {
    reader: ControlReader<R>,
    runner: JobRunner,
    sink: ResultSink<W>,
    max_parallel: usize,
}

impl<R, W> Worker<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(cfg: &WorkerConfig, input: R, output: W) -> Self {
        Self {
            reader: ControlReader::new(input, cfg.protocol.clone()),
            runner: JobRunner::new(&cfg.solver, &cfg.protocol.no_info),
            sink: ResultSink::new(output, &cfg.protocol.error_text),
            max_parallel: cfg.pool.effective_parallelism(),
        }
    }

    /// Returns once the sentinel arrives or the channel closes; only
    /// channel-level I/O failures surface as errors. Termination takes effect
    /// strictly between batches: a dispatched batch always runs to completion
    /// and emits all of its records first.
    pub async fn run(&mut self) -> Result<(), WorkerError> {
        loop {
            match self.reader.next_message().await? {
                None => {
                    tracing::warn!(
                        target: "satgrid.worker",
                        "control channel closed without terminate sentinel"
                    );
                    return Ok(());
                }
                Some(ControlMessage::Terminate) => {
                    tracing::info!(target: "satgrid.worker", "terminate received, shutting down");
                    return Ok(());
                }
                Some(ControlMessage::Batch(units)) => self.process_batch(units).await?,
            }
        }
    }

    /// Jobs overlap up to `max_parallel`, but `buffered` yields outcomes in
    /// submission order and this loop is the only writer, so the emitted
    /// lines always line up positionally with the batch. `buffered(1)` is the
    /// sequential case.
    async fn process_batch(&mut self, units: Vec<String>) -> Result<(), WorkerError> {
        let span = tracing::info_span!(
            target: "satgrid.worker",
            "batch",
            batch_id = %Uuid::new_v4(),
            units = units.len()
        );
        let runner = &self.runner;
        let sink = &mut self.sink;
        let max_parallel = self.max_parallel;

        async move {
            let mut outcomes = stream::iter(units)
                .map(|unit| async move { runner.run(&unit).await })
                .buffered(max_parallel);

            while let Some(outcome) = outcomes.next().await {
                sink.emit(&outcome).await?;
            }
            Ok(())
        }
        .instrument(span)
        .await
    }
}
