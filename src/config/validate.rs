// src/config/validate.rs

use crate::config::model::{RawSchedulerConfig, SchedulerConfig};
use crate::errors::{Result, TaskdagError};
use crate::types::{FailedDependencyPolicy, LogLevel};

impl TryFrom<RawSchedulerConfig> for SchedulerConfig {
    type Error = crate::errors::TaskdagError;

    fn try_from(raw: RawSchedulerConfig) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)
    }
}

/// Check a raw config and produce the typed, validated form.
pub fn validate_config(cfg: &RawSchedulerConfig) -> Result<SchedulerConfig> {
    let failed_dependency = validate_scheduler_section(cfg)?;
    let log_level = validate_logging_section(cfg)?;
    Ok(SchedulerConfig::new_unchecked(failed_dependency, log_level))
}

fn validate_scheduler_section(cfg: &RawSchedulerConfig) -> Result<FailedDependencyPolicy> {
    cfg.scheduler
        .failed_dependency
        .parse::<FailedDependencyPolicy>()
        .map_err(|msg| TaskdagError::ConfigError(format!("[scheduler]: {msg}")))
}

fn validate_logging_section(cfg: &RawSchedulerConfig) -> Result<Option<LogLevel>> {
    match cfg.logging.level.as_deref() {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Err(TaskdagError::ConfigError(
            "[logging].level must not be empty".to_string(),
        )),
        Some(s) => s
            .parse::<LogLevel>()
            .map(Some)
            .map_err(|msg| TaskdagError::ConfigError(format!("[logging]: {msg}"))),
    }
}
