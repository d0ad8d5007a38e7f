use super::outcome::{Satisfiability, SolveRecord};

const VARIABLES_LABEL: &str = "Number of variables:";
const CLAUSES_LABEL: &str = "Number of clauses:";
const CPU_TIME_LABEL: &str = "CPU time";

/// Extracts the result fields from a solver's captured stdout. Total: a
/// missing label degrades to the `no_info` placeholder, never an error.
pub fn parse_report(raw: &str, unit: &str, worker_pid: u32, no_info: &str) -> SolveRecord {
    let variables =
        labeled_token(raw, VARIABLES_LABEL).unwrap_or_else(|| missing(unit, "variables", no_info));
    let clauses =
        labeled_token(raw, CLAUSES_LABEL).unwrap_or_else(|| missing(unit, "clauses", no_info));
    let cpu_time = cpu_time_token(raw).unwrap_or_else(|| missing(unit, "cpu_time", no_info));

    // UNSAT first: "SATISFIABLE" is a substring of "UNSATISFIABLE", so the
    // longer marker must win.
    let satisfiability = if raw.contains("UNSATISFIABLE") {
        Satisfiability::Unsat
    } else if raw.contains("SATISFIABLE") {
        Satisfiability::Sat
    } else {
        tracing::warn!(target: "satgrid.report", unit, "report carries no satisfiability marker");
        Satisfiability::Unknown
    };

    SolveRecord {
        unit: unit.to_string(),
        clauses,
        variables,
        satisfiability,
        cpu_time,
        worker_pid,
    }
}

fn missing(unit: &str, field: &str, no_info: &str) -> String {
    tracing::warn!(target: "satgrid.report", unit, field, "label missing from solver report");
    no_info.to_string()
}

/// First whitespace-delimited token after `label`.
fn labeled_token(raw: &str, label: &str) -> Option<String> {
    let rest = &raw[raw.find(label)? + label.len()..];
    rest.split_whitespace().next().map(str::to_string)
}

/// "CPU time" is padded up to a `:` before its value token.
fn cpu_time_token(raw: &str) -> Option<String> {
    let rest = &raw[raw.find(CPU_TIME_LABEL)? + CPU_TIME_LABEL.len()..];
    let after_colon = &rest[rest.find(':')? + 1..];
    after_colon.split_whitespace().next().map(str::to_string)
}
