//! Result collection and reporting.
//!
//! A suite run produces one [`TestRecord`] per test case. The [`Report`]
//! aggregates them, prints the compliance summary grouped by extension
//! category and serializes the full result set to JSON for archival.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::common::error::{Error, Result};

/// Result of a single test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TestOutcome {
    /// Reference and tested model produced identical signatures.
    Passed,
    /// The test failed; the string describes the mismatch or tool error.
    Failed(String),
    /// The test did not run; the string is the skip reason.
    Skipped(String),
}

impl TestOutcome {
    /// Returns `true` for [`TestOutcome::Passed`].
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns `true` for [`TestOutcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns `true` for [`TestOutcome::Skipped`].
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Outcome of one test case together with its identity and duration.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecord {
    /// Test identifier, `group[file]`.
    pub id: String,
    /// Extension category the test counts towards in the summary.
    pub category: String,
    /// Result of the test.
    pub outcome: TestOutcome,
    /// Wall-clock duration of the test in seconds.
    pub duration_secs: f64,
}

impl TestRecord {
    /// Creates a record from a measured test execution.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        outcome: TestOutcome,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            outcome,
            duration_secs: duration.as_secs_f64(),
        }
    }
}

/// Provenance of a suite run, printed before the first test executes.
#[derive(Debug, Clone, Serialize)]
pub struct ReportHeader {
    /// ISA configuration string of the tested platform.
    pub isa: String,
    /// Toolchain binary directory the compilers were found in.
    pub toolchain: PathBuf,
    /// Root directory of the platform plugin.
    pub plugin_path: PathBuf,
    /// Tested model executable.
    pub model_path: PathBuf,
    /// Reference environment the golden executables were built against.
    pub reference_environment: PathBuf,
}

impl fmt::Display for ReportHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ISA: {}", self.isa)?;
        writeln!(f, "Toolchain: {}", self.toolchain.display())?;
        writeln!(f, "Plugin path: {}", self.plugin_path.display())?;
        writeln!(f, "RISC-V model path: {}", self.model_path.display())?;
        write!(
            f,
            "Reference environment: {}",
            self.reference_environment.display()
        )
    }
}

/// Per-category pass and fail counters. Skipped tests are not counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTally {
    /// Category name, the extension letter of the test group.
    pub name: String,
    /// Number of passed tests.
    pub passed: usize,
    /// Number of failed tests.
    pub failed: usize,
}

impl CategoryTally {
    /// Number of tests that ran in this category.
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Aggregated results of a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Display name of the tested model.
    pub model_name: String,
    /// Run provenance.
    pub header: ReportHeader,
    /// One record per test case, in execution order.
    pub records: Vec<TestRecord>,
}

impl Report {
    /// Creates an empty report for the given model and run provenance.
    pub fn new(model_name: impl Into<String>, header: ReportHeader) -> Self {
        Self {
            model_name: model_name.into(),
            header,
            records: Vec::new(),
        }
    }

    /// Appends a test record.
    pub fn push(&mut self, record: TestRecord) {
        self.records.push(record);
    }

    /// Number of passed tests.
    pub fn passed(&self) -> usize {
        self.count(TestOutcome::is_passed)
    }

    /// Number of failed tests.
    pub fn failed(&self) -> usize {
        self.count(TestOutcome::is_failed)
    }

    /// Number of skipped tests.
    pub fn skipped(&self) -> usize {
        self.count(TestOutcome::is_skipped)
    }

    /// Returns `true` when every test that ran passed.
    pub fn is_compliant(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, matches: fn(&TestOutcome) -> bool) -> usize {
        self.records
            .iter()
            .filter(|record| matches(&record.outcome))
            .count()
    }

    /// Pass and fail counts per category, in first-seen order.
    ///
    /// Skipped tests do not contribute; a category whose tests were all
    /// skipped does not appear at all.
    pub fn tallies(&self) -> Vec<CategoryTally> {
        let mut tallies: Vec<CategoryTally> = Vec::new();
        for record in &self.records {
            if record.outcome.is_skipped() {
                continue;
            }
            let position = match tallies
                .iter()
                .position(|tally| tally.name == record.category)
            {
                Some(position) => position,
                None => {
                    tallies.push(CategoryTally {
                        name: record.category.clone(),
                        passed: 0,
                        failed: 0,
                    });
                    tallies.len() - 1
                }
            };
            if record.outcome.is_passed() {
                tallies[position].passed += 1;
            } else {
                tallies[position].failed += 1;
            }
        }
        tallies
    }

    /// Renders the compliance summary.
    ///
    /// The base ISA category (`E` or `I`, whichever ran) is printed
    /// first as `Base ISA`, followed by one line per extension. Each
    /// line ends with `(OK)` or `(NOT compliant)`.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} with ISA configuration: {}",
            self.model_name,
            self.header.isa.to_uppercase()
        );

        let mut tallies = self.tallies();
        for base in ["E", "I"] {
            if let Some(position) =
                tallies.iter().position(|tally| tally.name == base)
            {
                let tally = tallies.remove(position);
                push_tally(&mut out, "Base ISA", &tally);
                break;
            }
        }
        for tally in &tallies {
            push_tally(&mut out, &tally.name, tally);
        }
        out
    }

    /// Serializes the report to pretty-printed JSON at `path`.
    ///
    /// Parent directories are created as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json).map_err(|e| Error::io(path, e))
    }
}

fn push_tally(out: &mut String, name: &str, tally: &CategoryTally) {
    let verdict = if tally.failed > 0 {
        "NOT compliant"
    } else {
        "OK"
    };
    out.push('\n');
    out.push_str(&format!(
        "{}: {}/{} passed ({})",
        name,
        tally.passed,
        tally.total(),
        verdict
    ));
}
