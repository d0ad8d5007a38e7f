use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "satgrid worker node: runs a SAT solver per work unit fed over stdin")]
pub struct Args {
    /// Config file path (defaults to ./worker.toml when present).
    #[arg(long)]
    pub config: Option<String>,

    /// Override the solver executable from the config.
    #[arg(long)]
    pub solver_bin: Option<String>,

    /// Override the job pool size. 1 = sequential, 0 = one job per core.
    #[arg(long)]
    pub max_parallel_jobs: Option<usize>,

    /// Override the batch-line field delimiter.
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<String>,

    /// Print the effective config as JSON and exit.
    #[arg(long, default_value_t = false)]
    pub dump_config: bool,
}
