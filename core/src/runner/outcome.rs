use std::fmt;

/// What one work unit produced: a parsed solver report, or the marker that
/// the solver never ran for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Solved(SolveRecord),
    SpawnFailed { unit: String },
}

/// Parsed summary of one solver run. The count and time fields carry the raw
/// report tokens; a missing label is carried as the configured "no info"
/// placeholder rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRecord {
    pub unit: String,
    pub clauses: String,
    pub variables: String,
    pub satisfiability: Satisfiability,
    pub cpu_time: String,
    /// Pid of this worker process, not the solver child.
    pub worker_pid: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfiability {
    Sat,
    Unsat,
    Unknown,
}

impl fmt::Display for Satisfiability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Satisfiability::Sat => "SAT",
            Satisfiability::Unsat => "UNSAT",
            Satisfiability::Unknown => "UNKNOWN",
        })
    }
}
