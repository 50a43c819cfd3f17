//! Error types for the compliance framework.
//!
//! A single [`Error`] enum covers every failure the library reports:
//! 1. **Configuration:** Invalid platform properties and values.
//! 2. **Headers:** Parse failures in target configuration headers.
//! 3. **Tools:** Missing executables, non-zero exits, and timeouts.
//! 4. **Artifacts:** ELF inspection, signatures, and plugin manifests.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported by the compliance framework.
#[derive(Debug, Error)]
pub enum Error {
    /// A filesystem operation failed.
    ///
    /// Carries the path the operation touched so messages stay actionable.
    #[error("{}: {source}", path.display())]
    Io {
        /// Path the failed operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A value does not belong to the expected domain.
    #[error("invalid value '{value}', valid values are: {expected}")]
    InvalidValue {
        /// The offending value.
        value: String,
        /// Human-readable description of accepted values.
        expected: &'static str,
    },

    /// A platform property violates its constraints.
    #[error("invalid platform configuration: {reason}")]
    Platform {
        /// What was violated.
        reason: String,
    },

    /// The requested target is not known to the framework.
    #[error("unknown target '{name}', known targets are: {known}")]
    UnknownTarget {
        /// Requested target name.
        name: String,
        /// Comma-separated list of built-in target names.
        known: String,
    },

    /// A configuration header could not be parsed.
    #[error("{header}:{line}: {reason}")]
    HeaderParse {
        /// Header file name.
        header: String,
        /// One-based line number of the offending line.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// The environment directory does not exist.
    #[error("environment path {} does not exist", path.display())]
    Environment {
        /// The missing directory.
        path: PathBuf,
    },

    /// An executable could not be located on disk or `PATH`.
    #[error("executable {name} not found")]
    ToolNotFound {
        /// Executable name or path as given.
        name: String,
    },

    /// No toolchain directory is configured and `RISCV` is unset.
    #[error("environment variable RISCV not set and no toolchain directory given")]
    ToolchainMissing,

    /// A tool exited with a non-zero status.
    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        /// Display name of the tool.
        tool: String,
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// A tool did not finish within its time budget.
    #[error("{tool} timed out after {timeout:?}")]
    ToolTimeout {
        /// Display name of the tool.
        tool: String,
        /// The exhausted time budget.
        timeout: Duration,
    },

    /// A tool could not be spawned or its output could not be captured.
    #[error("{tool}: {reason}")]
    Tool {
        /// Display name of the tool.
        tool: String,
        /// What went wrong.
        reason: String,
    },

    /// A signature file line is not a valid word.
    #[error("{}:{line}: {reason}", path.display())]
    SignatureParse {
        /// Signature file path.
        path: PathBuf,
        /// One-based line number of the offending line.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// An ELF file could not be parsed.
    #[error("{}: {reason}", path.display())]
    Elf {
        /// Executable path.
        path: PathBuf,
        /// Parser error description.
        reason: String,
    },

    /// A required symbol is missing from an executable.
    #[error("symbol {symbol} not found in {}", path.display())]
    SymbolNotFound {
        /// Symbol name that was looked up.
        symbol: String,
        /// Executable that was searched.
        path: PathBuf,
    },

    /// A plugin manifest could not be read or deserialized.
    #[error("{}: {reason}", path.display())]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Parse error description.
        reason: String,
    },

    /// Plugin generation failed before any file was written.
    #[error("plugin generation failed: {reason}")]
    Generate {
        /// What was missing or invalid.
        reason: String,
    },

    /// JSON serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for [`Error::InvalidValue`].
    pub fn invalid_value(value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            value: value.into(),
            expected,
        }
    }

    /// Shorthand for [`Error::Platform`].
    pub fn platform(reason: impl Into<String>) -> Self {
        Self::Platform {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Generate`].
    pub fn generate(reason: impl Into<String>) -> Self {
        Self::Generate {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}
