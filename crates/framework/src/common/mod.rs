//! Common types and constants used throughout the compliance framework.
//!
//! This module provides the building blocks shared across all components:
//! 1. **Architecture:** ISA, extension, mode, cause, and CSR vocabulary.
//! 2. **Constants:** Plugin layout, file naming, and discovery constants.
//! 3. **Error Handling:** The crate-wide error enum and result alias.

/// RISC-V architecture vocabulary (ISA, extensions, modes, causes, CSRs).
pub mod arch;

/// Framework-wide constants.
pub mod constants;

/// Error types and the crate result alias.
pub mod error;

pub use arch::{BaseIsa, Csr, Extension, MemoryRange, PrivilegeMode, TrapCause};
pub use error::{Error, Result};
