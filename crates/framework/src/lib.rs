//! RISC-V compliance testing framework library.
//!
//! This crate implements a compliance testsuite harness for RISC-V processor
//! models with the following:
//! 1. **Platform:** Description of the tested processor (ISA, extensions,
//!    modes, memory, traps) and its configuration string.
//! 2. **Targets:** Built-in target conventions with their configuration
//!    headers, parsed and checked against the test-macro surface.
//! 3. **Plugins:** Generated per-model packages bundling a manifest, header
//!    environment and execution conventions.
//! 4. **Tools:** Cross-compiler and model invocations with captured output
//!    and time budgets.
//! 5. **Suite:** Test groups with platform requirements, discovery, and the
//!    compile-run-compare runner.
//! 6. **Reporting:** Per-test records, the compliance summary, and the JSON
//!    report.

/// Common types and constants (architecture enums, errors, file names).
pub mod common;
/// Run configuration (work directory, time budgets, toolchain resolution).
pub mod config;
/// Header environments test sources are compiled against.
pub mod environment;
/// Description of a tested RISC-V platform.
pub mod platform;
/// Platform plugins (manifest, generation, loading).
pub mod plugin;
/// Result records, compliance summary, and the JSON report.
pub mod report;
/// Memory signatures and executable symbol lookup.
pub mod sig;
/// Test groups, platform requirements, and the suite runner.
pub mod suite;
/// Built-in target conventions and their configuration headers.
pub mod target;
/// Wrappers over the compiler and model executables.
pub mod tools;

/// Framework-wide error and result types.
pub use crate::common::error::{Error, Result};
/// Tested platform description; drives compilation and test admission.
pub use crate::platform::Platform;
/// Suite execution; construct from an opened plugin with `SuiteRunner::new`.
pub use crate::suite::SuiteRunner;
