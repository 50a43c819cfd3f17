//! Per-group platform requirements.
//!
//! Every test group declares what the tested platform must provide before
//! its sources are worth compiling: a base ISA, extensions, privilege
//! modes, memory properties or trap support. [`Requirements::check`]
//! compares a declaration against a [`Platform`] and either admits the
//! group or produces the reason it is skipped.

use std::fmt;

use crate::common::arch::{BaseIsa, Csr, Extension, PrivilegeMode, TrapCause};
use crate::platform::Platform;

/// Outcome of matching a test group against a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The platform satisfies every requirement; run the tests.
    Run,
    /// At least one requirement is unmet; the string is the skip reason.
    Skip(String),
}

impl Admission {
    /// Returns `true` when the tests should run.
    pub fn is_run(&self) -> bool {
        matches!(self, Self::Run)
    }
}

/// Declarative platform requirements for a test group.
///
/// Empty lists and `None` fields are unconstrained. The negative lists
/// (`skip_*`) invert the sense: the group is skipped when the platform
/// *does* provide the named feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    isa: Vec<BaseIsa>,
    isa_not: Vec<BaseIsa>,
    extensions: Vec<Extension>,
    extensions_not: Vec<Extension>,
    modes: Vec<PrivilegeMode>,
    modes_not: Vec<PrivilegeMode>,
    minimum_memory: Option<u64>,
    misaligned: Option<bool>,
    interrupt_support: Option<bool>,
    causes: Vec<TrapCause>,
    csrs: Vec<Csr>,
}

impl Requirements {
    /// Creates an empty requirement set that admits any platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the platform base ISA to be `isa`.
    pub fn isa(mut self, isa: BaseIsa) -> Self {
        self.isa.push(isa);
        self
    }

    /// Skips the group when the platform base ISA is `isa`.
    pub fn skip_isa(mut self, isa: BaseIsa) -> Self {
        self.isa_not.push(isa);
        self
    }

    /// Requires a standard extension.
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Skips the group when the platform implements `extension`.
    pub fn skip_extension(mut self, extension: Extension) -> Self {
        self.extensions_not.push(extension);
        self
    }

    /// Requires a privilege mode beyond machine mode.
    pub fn mode(mut self, mode: PrivilegeMode) -> Self {
        self.modes.push(mode);
        self
    }

    /// Skips the group when the platform implements `mode`.
    pub fn skip_mode(mut self, mode: PrivilegeMode) -> Self {
        self.modes_not.push(mode);
        self
    }

    /// Requires at least `bytes` of test memory.
    pub fn minimum_memory(mut self, bytes: u64) -> Self {
        self.minimum_memory = Some(bytes);
        self
    }

    /// Requires misaligned memory access support to equal `supported`.
    pub fn misaligned(mut self, supported: bool) -> Self {
        self.misaligned = Some(supported);
        self
    }

    /// Requires interrupt support to equal `supported`.
    pub fn interrupt_support(mut self, supported: bool) -> Self {
        self.interrupt_support = Some(supported);
        self
    }

    /// Requires a trap cause to be recognised.
    pub fn cause(mut self, cause: TrapCause) -> Self {
        self.causes.push(cause);
        self
    }

    /// Requires a control and status register to be implemented.
    pub fn csr(mut self, csr: Csr) -> Self {
        self.csrs.push(csr);
        self
    }

    /// Checks the requirements against `platform`.
    ///
    /// Requirements are evaluated in a fixed order and the first unmet
    /// one wins, so a group missing both an extension and a mode reports
    /// the extension. Unset platform properties (`misaligned` and
    /// `interrupt_support` left undeclared) never cause a skip.
    pub fn check(&self, platform: &Platform) -> Admission {
        let missing = required(&self.isa, &[platform.isa]);
        if !missing.is_empty() {
            return skip("Test requires architecture", &missing);
        }

        let missing = required(&self.extensions, &platform.extensions);
        if !missing.is_empty() {
            return skip("Test requires extension(s)", &missing);
        }

        let missing = required(&self.modes, &platform.modes);
        if !missing.is_empty() {
            return skip("Test requires mode(s)", &missing);
        }

        if let Some(bytes) = self.minimum_memory {
            if platform.memory.size < bytes {
                return Admission::Skip(format!(
                    "Test minimum memory size {bytes} Bytes"
                ));
            }
        }

        if let (Some(req), Some(sup)) = (self.misaligned, platform.misaligned) {
            if req != sup {
                return Admission::Skip(format!(
                    "Test requires misaligned memory access set to {req}"
                ));
            }
        }

        if let (Some(req), Some(sup)) =
            (self.interrupt_support, platform.interrupt_support)
        {
            if req != sup {
                return Admission::Skip(format!(
                    "Test requires interrupt support set to {req}"
                ));
            }
        }

        let missing = required(&self.causes, &platform.causes);
        if !missing.is_empty() {
            return skip("Test requires following exception(s) support:", &missing);
        }

        let missing = required(&self.csrs, &platform.csrs);
        if !missing.is_empty() {
            return skip(
                "Test requires following control or status register(s) support",
                &missing,
            );
        }

        let present = forbidden(&self.isa_not, &[platform.isa]);
        if !present.is_empty() {
            return skip("Test is skipped for architecture", &present);
        }

        let present = forbidden(&self.extensions_not, &platform.extensions);
        if !present.is_empty() {
            return skip("Test is skipped for extension(s)", &present);
        }

        let present = forbidden(&self.modes_not, &platform.modes);
        if !present.is_empty() {
            return skip("Test is skipped for mode(s)", &present);
        }

        Admission::Run
    }
}

/// Requirements the platform does not satisfy.
fn required<T: PartialEq + Copy>(wanted: &[T], supported: &[T]) -> Vec<T> {
    wanted
        .iter()
        .copied()
        .filter(|value| !supported.contains(value))
        .collect()
}

/// Exclusions the platform violates by providing the feature.
fn forbidden<T: PartialEq + Copy>(unwanted: &[T], supported: &[T]) -> Vec<T> {
    unwanted
        .iter()
        .copied()
        .filter(|value| supported.contains(value))
        .collect()
}

fn skip<T: fmt::Display>(reason: &str, values: &[T]) -> Admission {
    let list = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Admission::Skip(format!("{reason} {list}"))
}
