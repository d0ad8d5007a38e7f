use clap::Parser;

mod cli;

use satgrid_core::config::{self, WorkerConfig};
use satgrid_core::Worker;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let mut cfg = config::load_default(args.config.as_deref())?;
    if let Some(bin) = args.solver_bin {
        cfg.solver.bin = bin;
    }
    if let Some(n) = args.max_parallel_jobs {
        cfg.pool.max_parallel_jobs = n;
    }
    if let Some(d) = args.delimiter {
        cfg.protocol.delimiter = d;
    }
    if let Some(f) = args.log_file {
        cfg.log.file = f;
    }

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    // Keep the non-blocking appender's flush guard alive for the whole run.
    let _log_guard = init_tracing(&cfg.log.file);

    tracing::info!(
        target: "satgrid.worker",
        solver = %cfg.solver.bin,
        pool = cfg.pool.effective_parallelism(),
        "worker starting"
    );

    run_worker(cfg).await
}

async fn run_worker(cfg: WorkerConfig) -> anyhow::Result<()> {
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();
    let mut worker = Worker::new(&cfg, input, output);
    worker.run().await?;
    Ok(())
}

/// stdout carries the result protocol, so logs go to stderr, or to the
/// configured file via a non-blocking appender.
fn init_tracing(log_file: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if log_file.is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let expanded = shellexpand::tilde(log_file).into_owned();
    let path = std::path::Path::new(&expanded);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("satgrid-worker.log"));
    let appender =
        tracing_appender::rolling::never(dir.unwrap_or_else(|| std::path::Path::new(".")), file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
