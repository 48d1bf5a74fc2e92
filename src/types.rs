use std::str::FromStr;
use serde::Deserialize;

/// What the resolver does with a pending task whose dependency can no longer
/// complete (failed, retired or itself blocked).
///
/// - `Block`: report the task in `tasks_to_block` so the host can mark it
///   `Blocked` (default behaviour). Propagates transitively in one pass.
/// - `Wait`: treat the dependency as merely unsatisfied; the task stays out
///   of every output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedDependencyPolicy {
    Block,
    Wait,
}

impl Default for FailedDependencyPolicy {
    fn default() -> Self {
        FailedDependencyPolicy::Block
    }
}

impl FromStr for FailedDependencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "block" => Ok(FailedDependencyPolicy::Block),
            "wait" => Ok(FailedDependencyPolicy::Wait),
            other => Err(format!(
                "invalid failed_dependency: {other} (expected \"block\" or \"wait\")"
            )),
        }
    }
}

/// Log level as exposed in `[logging]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}
