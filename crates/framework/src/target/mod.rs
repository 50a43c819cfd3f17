//! Built-in targets and their configuration headers.
//!
//! A target is a hardware implementation or simulator the test
//! scaffolding is specialized for. Each built-in target fixes the
//! invocation conventions the runner uses and may ship configuration
//! headers that override the reference environment's.
//!
//! ## Submodules
//!
//! - [`header`]: configuration header parsing.
//! - [`surface`]: the twelve-macro surface skeletons expect.
//! - [`templates`]: the verbatim built-in header texts.
//! - [`validate`]: structural checks over parsed headers.

pub mod header;
pub mod surface;
pub mod templates;
pub mod validate;

pub use header::HeaderFile;
pub use validate::Violation;

use serde::{Deserialize, Serialize};

use crate::common::constants::{IO_HEADER_FILE, TEST_HEADER_FILE};
use crate::common::error::{Error, Result};

/// How a tested model executable is driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelInterface {
    /// Spike-style invocation: `--isa=<string> +signature=<file>`.
    #[default]
    Reference,
    /// Codasip SDK simulator: `-r <exe> --info 5`, signature on stdout.
    CodasipSdk,
    /// RI5CY Verilator testbench: hex image plus signature bounds.
    Ri5cyVerilator,
    /// riscvOVPsim: variant selection plus signature-dump overrides.
    RiscvOvpsim,
}

/// How test sources are compiled for the tested model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerProfile {
    /// The full reference flag set, `-march` derived from the platform.
    #[default]
    Reference,
    /// Bare `-nostdlib` compilation for SDK-managed environments.
    Minimal,
}

/// A built-in target: registry name, conventions, and header set.
#[derive(Debug)]
pub struct Target {
    name: &'static str,
    description: &'static str,
    interface: ModelInterface,
    compiler: CompilerProfile,
    model_name: Option<&'static str>,
    headers: &'static [(&'static str, &'static str)],
}

impl Target {
    /// Registry name, as given to `find`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Invocation convention of models built for this target.
    pub fn interface(&self) -> ModelInterface {
        self.interface
    }

    /// Compilation profile of the tested side.
    pub fn compiler(&self) -> CompilerProfile {
        self.compiler
    }

    /// Fixed model display name, for targets that impose one.
    pub fn model_name(&self) -> Option<&'static str> {
        self.model_name
    }

    /// Header files this target supplies, as `(file name, text)` pairs.
    ///
    /// Mandatory headers not listed here fall back to the reference
    /// environment during plugin generation.
    pub fn headers(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.headers.iter().copied()
    }

    /// Text of one supplied header, by file name.
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find_map(|(file, text)| (*file == name).then_some(*text))
    }

    /// Parses and structurally checks every supplied header.
    ///
    /// Returns the collected violations; an empty vector means the
    /// header set honours the harness contract. Targets supplying no
    /// headers trivially pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HeaderParse`] when a header text cannot be
    /// parsed at all.
    pub fn validate(&self) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for (file, text) in self.headers() {
            let parsed = HeaderFile::parse(file, text)?;
            match file {
                TEST_HEADER_FILE => violations.extend(validate::check_test_header(&parsed)),
                IO_HEADER_FILE => violations.extend(validate::check_io_header(&parsed)),
                _ => {}
            }
        }
        Ok(violations)
    }
}

/// The built-in target registry.
static BUILTIN: [Target; 4] = [
    Target {
        name: "default",
        description: "reference conventions, no target headers",
        interface: ModelInterface::Reference,
        compiler: CompilerProfile::Reference,
        model_name: None,
        headers: &[],
    },
    Target {
        name: "codasip-sdk",
        description: "Codasip proprietary SDK simulator",
        interface: ModelInterface::CodasipSdk,
        compiler: CompilerProfile::Minimal,
        model_name: None,
        headers: &[(TEST_HEADER_FILE, templates::CODASIP_COMPLIANCE_TEST_H)],
    },
    Target {
        name: "ri5cy-verilator",
        description: "RI5CY core under Verilator",
        interface: ModelInterface::Ri5cyVerilator,
        compiler: CompilerProfile::Reference,
        model_name: None,
        headers: &[(IO_HEADER_FILE, templates::RI5CY_COMPLIANCE_IO_H)],
    },
    Target {
        name: "riscv-ovpsim",
        description: "Imperas riscvOVPsim reference simulator",
        interface: ModelInterface::RiscvOvpsim,
        compiler: CompilerProfile::Reference,
        model_name: Some("OVPsim"),
        headers: &[],
    },
];

/// All built-in targets, in listing order.
pub fn builtin() -> &'static [Target] {
    &BUILTIN
}

/// Looks a built-in target up by registry name.
///
/// # Errors
///
/// Returns [`Error::UnknownTarget`] naming the known targets.
pub fn find(name: &str) -> Result<&'static Target> {
    BUILTIN
        .iter()
        .find(|target| target.name == name)
        .ok_or_else(|| Error::UnknownTarget {
            name: name.to_string(),
            known: BUILTIN
                .iter()
                .map(Target::name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
