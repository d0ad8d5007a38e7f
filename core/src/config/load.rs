use std::path::Path;

use super::types::WorkerConfig;

/// Loads the worker config from `path`, or `worker.toml` in the current
/// directory when present, falling back to defaults. Environment overrides
/// are applied last.
pub fn load_default(path: Option<&str>) -> anyhow::Result<WorkerConfig> {
    let mut cfg: WorkerConfig = match path {
        Some(p) => {
            let expanded = shellexpand::tilde(p);
            let s = std::fs::read_to_string(expanded.as_ref())?;
            toml::from_str::<WorkerConfig>(&s)?
        }
        None if Path::new("worker.toml").exists() => {
            let s = std::fs::read_to_string("worker.toml")?;
            toml::from_str::<WorkerConfig>(&s)?
        }
        None => WorkerConfig::default(),
    };

    if let Ok(v) = std::env::var("SATGRID_SOLVER_BIN") {
        if !v.trim().is_empty() {
            cfg.solver.bin = v;
        }
    }
    if let Ok(v) = std::env::var("SATGRID_MAX_PARALLEL_JOBS") {
        if let Ok(n) = v.trim().parse::<usize>() {
            cfg.pool.max_parallel_jobs = n;
        }
    }

    Ok(cfg)
}
