//! The RISC-V compliance test suite.
//!
//! Test sources are assembly programs grouped by base ISA, extension and
//! privilege mode. Each [`TestGroup`] names a directory of sources, the
//! `-march` string they are built with and the platform [`Requirements`]
//! that admit them. The [`runner`] compiles every admitted source for
//! both the reference model and the device under test and compares the
//! memory signatures the two executions produce.
//!
//! ## Submodules
//!
//! - [`requirements`]: per-group platform requirements and admission.
//! - [`runner`]: compile-run-compare execution of the suite.

pub mod requirements;
pub mod runner;

pub use requirements::{Admission, Requirements};
pub use runner::{SuiteRunner, TestEnvironment};

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::arch::{BaseIsa, Extension, PrivilegeMode};
use crate::common::error::{Error, Result};

/// File name pattern selecting sources within a group directory.
///
/// Patterns match against the path of a source relative to the group
/// directory, so a fragment can select a whole family of tests
/// (`ma_addr` matches `ma_addr-01.S` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePattern {
    /// Matches paths ending with the given suffix.
    Suffix(&'static str),
    /// Matches paths containing the given fragment.
    Contains(&'static str),
}

impl SourcePattern {
    fn matches(self, relative: &str) -> bool {
        match self {
            Self::Suffix(suffix) => relative.ends_with(suffix),
            Self::Contains(fragment) => relative.contains(fragment),
        }
    }
}

/// A single test source admitted into a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    id: String,
    source: PathBuf,
}

impl TestCase {
    /// Unique identifier, `group[file]`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Absolute path of the assembly source.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File name of the assembly source.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A group of test sources sharing a directory, toolchain configuration
/// and platform requirements.
#[derive(Debug, Clone)]
pub struct TestGroup {
    name: &'static str,
    path: &'static [&'static str],
    pattern: SourcePattern,
    exclude: Option<&'static str>,
    march: &'static str,
    requirements: Requirements,
}

impl TestGroup {
    /// Group name, also the prefix of every test identifier it yields.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Directory of the group relative to the suite root.
    pub fn path(&self) -> PathBuf {
        self.path.iter().collect()
    }

    /// Extension category the group reports under.
    ///
    /// This is the single-letter component of the group path; `I` and
    /// `E` groups are summarised as the base ISA.
    pub fn category(&self) -> &'static str {
        self.path
            .iter()
            .copied()
            .find(|component| component.len() == 1)
            .unwrap_or("others")
    }

    /// Architecture string passed to the compiler as `-march`.
    pub fn march(&self) -> &'static str {
        self.march
    }

    /// Platform requirements gating the group.
    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Returns `true` when a source path relative to the group directory
    /// belongs to this group.
    pub fn matches(&self, relative: &str) -> bool {
        if !self.pattern.matches(relative) {
            return false;
        }
        match self.exclude {
            Some(fragment) => !relative.contains(fragment),
            None => true,
        }
    }

    /// Collects the group's test cases under `suite_root`.
    ///
    /// The group directory is walked recursively and matching sources
    /// are returned sorted by relative path. A missing directory yields
    /// an empty list, which the runner reports as a skipped group.
    pub fn discover(&self, suite_root: &Path) -> Result<Vec<TestCase>> {
        let dir = suite_root.join(self.path());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut sources = Vec::new();
        collect_files(&dir, &mut sources)?;

        let mut cases = Vec::new();
        for source in sources {
            let relative = match source.strip_prefix(&dir) {
                Ok(relative) => relative.to_string_lossy().into_owned(),
                Err(_) => continue,
            };
            if self.matches(&relative) {
                cases.push((relative, source));
            }
        }
        cases.sort();

        Ok(cases
            .into_iter()
            .map(|(_, source)| {
                let file = source
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                TestCase {
                    id: format!("{}[{}]", self.name, file),
                    source,
                }
            })
            .collect())
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// The built-in compliance suite.
///
/// Groups mirror the layout of the test sources: `rv32i` and `rv64i`
/// trees, subdivided by extension and privilege mode. Misaligned-access
/// tests form their own groups because they only apply to platforms
/// that trap misaligned loads, stores or jumps.
pub fn builtin_groups() -> Vec<TestGroup> {
    vec![
        TestGroup {
            name: "rv32i_i_isa",
            path: &["rv32i", "I", "ISA"],
            pattern: SourcePattern::Suffix(".S"),
            exclude: Some("MISALIGN"),
            march: "rv32i",
            requirements: Requirements::new().isa(BaseIsa::Rv32I),
        },
        TestGroup {
            name: "rv32i_i_isa_misalign_ldst",
            path: &["rv32i", "I", "ISA"],
            pattern: SourcePattern::Contains("MISALIGN_LDST"),
            exclude: None,
            march: "rv32i",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .misaligned(false),
        },
        TestGroup {
            name: "rv32i_i_isa_misalign_jmp",
            path: &["rv32i", "I", "ISA"],
            pattern: SourcePattern::Contains("MISALIGN_JMP"),
            exclude: None,
            march: "rv32i",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .misaligned(false)
                .skip_extension(Extension::C),
        },
        TestGroup {
            name: "rv32i_i_m",
            path: &["rv32i", "I", "M"],
            pattern: SourcePattern::Suffix(".S"),
            exclude: Some("ma_"),
            march: "rv32i",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .mode(PrivilegeMode::Machine),
        },
        TestGroup {
            name: "rv32i_i_m_ma_addr",
            path: &["rv32i", "I", "M"],
            pattern: SourcePattern::Contains("ma_addr"),
            exclude: None,
            march: "rv32i",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .mode(PrivilegeMode::Machine)
                .misaligned(false),
        },
        TestGroup {
            name: "rv32i_i_m_ma_fetch",
            path: &["rv32i", "I", "M"],
            pattern: SourcePattern::Contains("ma_fetch"),
            exclude: None,
            march: "rv32i",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .mode(PrivilegeMode::Machine)
                .misaligned(false)
                .skip_extension(Extension::C),
        },
        TestGroup {
            name: "rv32i_i_s",
            path: &["rv32i", "I", "S"],
            pattern: SourcePattern::Suffix(".S"),
            exclude: None,
            march: "rv32i",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .mode(PrivilegeMode::Supervisor),
        },
        TestGroup {
            name: "rv32i_c_isa",
            path: &["rv32i", "C", "ISA"],
            pattern: SourcePattern::Suffix(".S"),
            exclude: None,
            march: "rv32imc",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .extension(Extension::C),
        },
        TestGroup {
            name: "rv32i_f_u",
            path: &["rv32i", "F", "U"],
            pattern: SourcePattern::Suffix(".S"),
            exclude: None,
            march: "rv32if",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv32I)
                .extension(Extension::F)
                .mode(PrivilegeMode::User),
        },
        TestGroup {
            name: "rv64i_i_isa",
            path: &["rv64i", "I", "ISA"],
            pattern: SourcePattern::Suffix(".S"),
            exclude: None,
            march: "rv64i",
            requirements: Requirements::new().isa(BaseIsa::Rv64I),
        },
        TestGroup {
            name: "rv64i_m_isa",
            path: &["rv64i", "M", "ISA"],
            pattern: SourcePattern::Suffix(".S"),
            exclude: None,
            march: "rv64im",
            requirements: Requirements::new()
                .isa(BaseIsa::Rv64I)
                .extension(Extension::M),
        },
    ]
}
