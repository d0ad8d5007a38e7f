use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default)]
    pub solver: SolverConfig,

    #[serde(default)]
    pub protocol: ProtocolConfig,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Solver executable, invoked with the work-unit id as its only argument.
    #[serde(default = "default_solver_bin")]
    pub bin: String,
}

fn default_solver_bin() -> String {
    "minisat".to_string()
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            bin: default_solver_bin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Field delimiter between work-unit ids on a batch line.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Exact-match termination sentinel. A prefix match is a batch, not a stop.
    #[serde(default = "default_terminate")]
    pub terminate: String,

    /// Literal line emitted in place of a result when the solver never ran.
    #[serde(default = "default_error_text")]
    pub error_text: String,

    /// Placeholder carried in any result field whose label was missing from
    /// the solver report.
    #[serde(default = "default_no_info")]
    pub no_info: String,

    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,

    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
}

fn default_delimiter() -> char {
    ','
}

fn default_terminate() -> String {
    "terminate".to_string()
}

fn default_error_text() -> String {
    "solver spawn failed".to_string()
}

fn default_no_info() -> String {
    "NO_INFO".to_string()
}

fn default_max_line_bytes() -> usize {
    8192
}

fn default_max_batch() -> usize {
    50
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            terminate: default_terminate(),
            error_text: default_error_text(),
            no_info: default_no_info(),
            max_line_bytes: default_max_line_bytes(),
            max_batch: default_max_batch(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// 1 = run jobs sequentially, n = bounded pool of n, 0 = one job per core.
    #[serde(default = "default_max_parallel_jobs")]
    pub max_parallel_jobs: usize,
}

fn default_max_parallel_jobs() -> usize {
    1
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_parallel_jobs: default_max_parallel_jobs(),
        }
    }
}

impl PoolConfig {
    pub fn effective_parallelism(&self) -> usize {
        if self.max_parallel_jobs == 0 {
            num_cpus::get().max(1)
        } else {
            self.max_parallel_jobs
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file path; empty means stderr.
    #[serde(default)]
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let cfg = WorkerConfig::default();
        assert_eq!(cfg.solver.bin, "minisat");
        assert_eq!(cfg.protocol.delimiter, ',');
        assert_eq!(cfg.protocol.terminate, "terminate");
        assert_eq!(cfg.protocol.no_info, "NO_INFO");
        assert_eq!(cfg.protocol.max_batch, 50);
        assert_eq!(cfg.pool.max_parallel_jobs, 1);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: WorkerConfig = toml::from_str(
            r#"
[solver]
bin = "/opt/sat/minisat"

[protocol]
delimiter = "|"
"#,
        )
        .unwrap();
        assert_eq!(cfg.solver.bin, "/opt/sat/minisat");
        assert_eq!(cfg.protocol.delimiter, '|');
        assert_eq!(cfg.protocol.terminate, "terminate");
        assert_eq!(cfg.pool.max_parallel_jobs, 1);
    }

    #[test]
    fn zero_pool_means_per_core() {
        let pool = PoolConfig {
            max_parallel_jobs: 0,
        };
        assert!(pool.effective_parallelism() >= 1);
    }
}
