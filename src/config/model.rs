// src/config/model.rs

use serde::Deserialize;

use crate::types::{FailedDependencyPolicy, LogLevel};

/// Scheduler configuration as read from a TOML file.
///
/// ```toml
/// [scheduler]
/// failed_dependency = "block"
///
/// [logging]
/// level = "debug"
/// ```
///
/// All sections are optional and have reasonable defaults. Unknown sections
/// and keys are rejected so that typos do not silently fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSchedulerConfig {
    #[serde(default)]
    pub scheduler: RawSchedulerSection,

    #[serde(default)]
    pub logging: RawLoggingSection,
}

/// `[scheduler]` section, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSchedulerSection {
    /// `"block"` or `"wait"`.
    #[serde(default = "default_failed_dependency")]
    pub failed_dependency: String,
}

fn default_failed_dependency() -> String {
    "block".to_string()
}

impl Default for RawSchedulerSection {
    fn default() -> Self {
        Self {
            failed_dependency: default_failed_dependency(),
        }
    }
}

/// `[logging]` section, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLoggingSection {
    /// If `None`, `TASKDAG_LOG` or `info` is used.
    #[serde(default)]
    pub level: Option<String>,
}

/// Validated scheduler configuration.
///
/// Only obtainable through `TryFrom<RawSchedulerConfig>` or `Default`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub failed_dependency: FailedDependencyPolicy,
    pub log_level: Option<LogLevel>,
}

impl SchedulerConfig {
    pub(crate) fn new_unchecked(
        failed_dependency: FailedDependencyPolicy,
        log_level: Option<LogLevel>,
    ) -> Self {
        Self {
            failed_dependency,
            log_level,
        }
    }

    /// Builder-style override, mostly for tests and embedding hosts.
    pub fn with_failed_dependency(mut self, policy: FailedDependencyPolicy) -> Self {
        self.failed_dependency = policy;
        self
    }
}
