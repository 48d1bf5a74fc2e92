// src/config/mod.rs

//! Configuration loading and validation for the scheduler.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: load a config file from disk.
//! - `validate.rs`: turn raw strings into typed policies.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{RawLoggingSection, RawSchedulerConfig, RawSchedulerSection, SchedulerConfig};
pub use validate::validate_config;
