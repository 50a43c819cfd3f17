//! Run configuration for the compliance framework.
//!
//! This module defines the knobs a suite run is parameterized with:
//! 1. **Defaults:** Baseline work-dir name and tool time budgets.
//! 2. **Structure:** The [`RunConfig`] consumed by the suite runner.
//! 3. **Toolchain resolution:** `RISCV` environment fallback handling.

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

use crate::common::constants::RISCV_ENV;
use crate::common::error::{Error, Result};

/// Default configuration constants for suite runs.
///
/// These values apply when a field is not explicitly set in a JSON
/// configuration file or on the command line.
mod defaults {
    /// Working directory created in the current directory for run artifacts.
    pub const WORK_DIR: &str = "rv_compliance_work";

    /// Time budget for a single compiler invocation, in seconds.
    pub const COMPILE_TIMEOUT_SECS: u64 = 10;

    /// Time budget for a single model execution, in seconds.
    pub const RUN_TIMEOUT_SECS: u64 = 30;
}

/// Configuration of a compliance suite run.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use rvtest_core::config::RunConfig;
///
/// let config = RunConfig::default();
/// assert_eq!(config.work_dir.to_str(), Some("rv_compliance_work"));
/// assert_eq!(config.compile_timeout_secs, 10);
/// assert_eq!(config.run_timeout_secs, 30);
/// assert!(config.preserve_failed);
/// ```
///
/// Deserializing from JSON with partial overrides:
///
/// ```
/// use rvtest_core::config::RunConfig;
///
/// let json = r#"{
///     "work_dir": "scratch",
///     "run_timeout_secs": 60
/// }"#;
///
/// let config: RunConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.work_dir.to_str(), Some("scratch"));
/// assert_eq!(config.compile_timeout_secs, 10);
/// assert_eq!(config.run_timeout_secs, 60);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Working directory of the run. Recreated on every run; holds
    /// per-test scratch space, preserved failures, and the report.
    #[serde(default = "RunConfig::default_work_dir")]
    pub work_dir: PathBuf,

    /// Toolchain binary directory. When unset, `$RISCV/bin` is used.
    #[serde(default)]
    pub toolchain: Option<PathBuf>,

    /// Time budget for a single compiler invocation, in seconds.
    #[serde(default = "RunConfig::default_compile_timeout")]
    pub compile_timeout_secs: u64,

    /// Time budget for a single model execution, in seconds.
    #[serde(default = "RunConfig::default_run_timeout")]
    pub run_timeout_secs: u64,

    /// Keep work-dir contents of failed tests under `failed/`.
    #[serde(default = "RunConfig::default_preserve_failed")]
    pub preserve_failed: bool,
}

impl RunConfig {
    /// Returns the default working directory.
    fn default_work_dir() -> PathBuf {
        PathBuf::from(defaults::WORK_DIR)
    }

    /// Returns the default compile time budget.
    fn default_compile_timeout() -> u64 {
        defaults::COMPILE_TIMEOUT_SECS
    }

    /// Returns the default execution time budget.
    fn default_run_timeout() -> u64 {
        defaults::RUN_TIMEOUT_SECS
    }

    /// Failed-test artifacts are preserved by default.
    fn default_preserve_failed() -> bool {
        true
    }

    /// Resolves the toolchain binary directory.
    ///
    /// Uses the configured directory when present, otherwise falls back
    /// to `$RISCV/bin`. Fails when neither is available.
    pub fn toolchain_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.toolchain {
            return Ok(dir.clone());
        }
        match env::var(RISCV_ENV) {
            Ok(root) if !root.is_empty() => Ok(PathBuf::from(root).join("bin")),
            _ => Err(Error::ToolchainMissing),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            work_dir: Self::default_work_dir(),
            toolchain: None,
            compile_timeout_secs: defaults::COMPILE_TIMEOUT_SECS,
            run_timeout_secs: defaults::RUN_TIMEOUT_SECS,
            preserve_failed: true,
        }
    }
}
