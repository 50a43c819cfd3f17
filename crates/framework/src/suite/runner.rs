//! Suite execution.
//!
//! The runner drives the full compile-run-compare cycle:
//! 1. **Admission:** each group's requirements are checked against the
//!    tested platform; unmet groups are recorded as skipped.
//! 2. **Build:** every admitted source is compiled twice, once against
//!    the reference environment and once against the plugin's.
//! 3. **Execution:** both executables run on their models and the
//!    resulting memory signatures are compared word by word.
//!
//! Each test executes in a scratch directory that is wiped beforehand;
//! on failure the directory is preserved under `failed/` for diagnosis.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::common::constants::{
    DUT_EXE_SUFFIX, FAILED_SUBDIR, REF_EXE_SUFFIX, REPORT_SUBDIR, WORK_SUBDIR,
};
use crate::common::error::{Error, Result};
use crate::config::RunConfig;
use crate::environment::Environment;
use crate::platform::Platform;
use crate::plugin::Plugin;
use crate::report::{Report, ReportHeader, TestOutcome, TestRecord};
use crate::sig::Comparison;
use crate::suite::{builtin_groups, Admission, TestCase, TestGroup};
use crate::target::CompilerProfile;
use crate::tools::compiler::RiscvCompiler;
use crate::tools::model::{DutModel, GoldenModel};
use crate::tools::{find_gcc, find_spike};

/// Scratch directory name under `<work>/work/`.
const WORKER_NAME: &str = "main";

/// JSON report file name under `<work>/report/`.
const REPORT_FILE: &str = "report.json";

/// A compiler paired with the header environment it builds against.
#[derive(Debug)]
pub struct TestEnvironment {
    /// Compiler invoked for every source of this side.
    pub compiler: RiscvCompiler,
    /// Directory providing headers and the linker script.
    pub environment: Environment,
}

/// Executes the compliance suite against a tested model.
#[derive(Debug)]
pub struct SuiteRunner {
    config: RunConfig,
    platform: Platform,
    suite_root: PathBuf,
    groups: Vec<TestGroup>,
    reference: TestEnvironment,
    dut: TestEnvironment,
    golden: GoldenModel,
    model: DutModel,
    model_name: String,
    header: ReportHeader,
}

impl SuiteRunner {
    /// Assembles a runner from a plugin and run configuration.
    ///
    /// Locates the toolchain compiler and the reference model under the
    /// configured toolchain directory and wires both execution sides.
    /// The tested platform is taken from the plugin manifest.
    pub fn new(
        plugin: &Plugin,
        model_path: impl Into<PathBuf>,
        reference_environment: Environment,
        suite_root: impl Into<PathBuf>,
        config: RunConfig,
    ) -> Result<Self> {
        let model_path = model_path.into();
        let suite_root = suite_root.into();

        let toolchain = config.toolchain_dir()?;
        let gcc = find_gcc(&toolchain)?;
        let spike = find_spike(&toolchain)?;

        let compile_timeout = Duration::from_secs(config.compile_timeout_secs);
        let run_timeout = Duration::from_secs(config.run_timeout_secs);

        let manifest = plugin.manifest();
        let platform = plugin.platform().clone();

        let header = ReportHeader {
            isa: platform.configuration_string(),
            toolchain: toolchain.clone(),
            plugin_path: plugin.root().to_path_buf(),
            model_path: model_path.clone(),
            reference_environment: reference_environment.root().to_path_buf(),
        };

        let reference = TestEnvironment {
            compiler: RiscvCompiler::new(&gcc, CompilerProfile::Reference)?
                .with_timeout(compile_timeout),
            environment: reference_environment,
        };
        let dut = TestEnvironment {
            compiler: RiscvCompiler::new(&gcc, manifest.compiler)?
                .with_timeout(compile_timeout),
            environment: plugin.environment()?,
        };

        let golden = GoldenModel::new(&spike)?.with_timeout(run_timeout);
        let model =
            DutModel::new(&model_path, manifest.name.clone(), manifest.interface)?
                .with_timeout(run_timeout);

        Ok(Self {
            config,
            platform,
            suite_root,
            groups: builtin_groups(),
            reference,
            dut,
            golden,
            model,
            model_name: manifest.name.clone(),
            header,
        })
    }

    /// Replaces the built-in test groups, for partial or custom runs.
    pub fn with_groups(mut self, groups: Vec<TestGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// Run provenance printed before the suite starts.
    pub fn header(&self) -> &ReportHeader {
        &self.header
    }

    /// Runs every group and returns the aggregated report.
    ///
    /// The working directory is recreated from scratch. The JSON report
    /// is written to `<work>/report/report.json` before returning.
    pub fn run(&self) -> Result<Report> {
        let work_dir = &self.config.work_dir;
        if work_dir.is_dir() {
            fs::remove_dir_all(work_dir).map_err(|e| Error::io(work_dir, e))?;
        }
        fs::create_dir_all(work_dir).map_err(|e| Error::io(work_dir, e))?;

        let mut report = Report::new(&self.model_name, self.header.clone());
        for group in &self.groups {
            self.run_group(group, &mut report)?;
        }

        let report_path = work_dir.join(REPORT_SUBDIR).join(REPORT_FILE);
        report.save(&report_path)?;
        info!("report written to {}", report_path.display());

        Ok(report)
    }

    fn run_group(&self, group: &TestGroup, report: &mut Report) -> Result<()> {
        let cases = group.discover(&self.suite_root)?;
        if cases.is_empty() {
            info!("skipping {}: no files found", group.name());
            report.push(TestRecord::new(
                group.name(),
                group.category(),
                TestOutcome::Skipped("No files found".into()),
                Duration::ZERO,
            ));
            return Ok(());
        }

        if let Admission::Skip(reason) = group.requirements().check(&self.platform) {
            info!("skipping {}: {}", group.name(), reason);
            for case in &cases {
                report.push(TestRecord::new(
                    case.id(),
                    group.category(),
                    TestOutcome::Skipped(reason.clone()),
                    Duration::ZERO,
                ));
            }
            return Ok(());
        }

        for case in &cases {
            let started = Instant::now();
            let outcome = match self.execute(group, case) {
                Ok(comparison) if comparison.is_match() => TestOutcome::Passed,
                Ok(comparison) => TestOutcome::Failed(comparison.to_string()),
                Err(error) => TestOutcome::Failed(error.to_string()),
            };
            let duration = started.elapsed();

            match &outcome {
                TestOutcome::Failed(reason) => {
                    warn!("{} failed: {}", case.id(), reason);
                    if self.config.preserve_failed {
                        self.preserve_failed(case);
                    }
                }
                _ => info!("{} passed", case.id()),
            }
            report.push(TestRecord::new(
                case.id(),
                group.category(),
                outcome,
                duration,
            ));
        }
        Ok(())
    }

    /// Compiles and runs one test on both sides, returning the verdict.
    ///
    /// Any tool failure is an `Err` and marks the test as failed without
    /// aborting the rest of the suite.
    fn execute(&self, group: &TestGroup, case: &TestCase) -> Result<Comparison> {
        let scratch = self.reset_scratch()?;

        let file = case.file_name();
        let reference_exe = scratch.join(format!("{}{}", file, REF_EXE_SUFFIX));
        let tested_exe = scratch.join(format!("{}{}", file, DUT_EXE_SUFFIX));

        self.reference.compiler.compile(
            case.source(),
            &reference_exe,
            &self.reference.environment,
            &self.platform,
            group.march(),
        )?;
        self.dut.compiler.compile(
            case.source(),
            &tested_exe,
            &self.dut.environment,
            &self.platform,
            group.march(),
        )?;

        let expected = self.golden.run(&reference_exe, &self.platform)?;
        let actual = self.model.run(&tested_exe, &self.platform, &scratch)?;

        Ok(expected.compare(&actual))
    }

    fn scratch_dir(&self) -> PathBuf {
        self.config.work_dir.join(WORK_SUBDIR).join(WORKER_NAME)
    }

    /// Recreates the per-test scratch directory.
    fn reset_scratch(&self) -> Result<PathBuf> {
        let scratch = self.scratch_dir();
        if scratch.is_dir() {
            fs::remove_dir_all(&scratch).map_err(|e| Error::io(&scratch, e))?;
        }
        fs::create_dir_all(&scratch).map_err(|e| Error::io(&scratch, e))?;
        Ok(scratch)
    }

    /// Copies the scratch directory of a failed test under `failed/`.
    ///
    /// Preservation is best effort; a copy error is logged and the run
    /// carries on.
    fn preserve_failed(&self, case: &TestCase) {
        let target = self
            .config
            .work_dir
            .join(FAILED_SUBDIR)
            .join(failure_dir_name(case.id()));
        if target.is_dir() {
            if let Err(error) = fs::remove_dir_all(&target) {
                warn!(
                    "unable to preserve artifacts of {}: {}",
                    case.id(),
                    error
                );
                return;
            }
        }
        if let Err(error) = copy_dir(&self.scratch_dir(), &target) {
            warn!("unable to preserve artifacts of {}: {}", case.id(), error);
        }
    }
}

/// Turns a test identifier into a directory name.
///
/// Runs of characters outside letters, digits, `_`, whitespace, `.`,
/// `(` and `)` collapse to a single `-`; leading and trailing
/// whitespace and hyphens are trimmed. `rv32i_i_isa[I-ADD-01.S]`
/// becomes `rv32i_i_isa-I-ADD-01.S`.
pub fn failure_dir_name(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut pending = false;
    for c in id.chars() {
        let keep = c.is_alphanumeric()
            || c.is_whitespace()
            || matches!(c, '_' | '.' | '(' | ')');
        if keep {
            if pending {
                out.push('-');
                pending = false;
            }
            out.push(c);
        } else {
            pending = true;
        }
    }
    out.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n' | '-'))
        .to_string()
}

fn copy_dir(source: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(target).map_err(|e| Error::io(target, e))?;
    for entry in fs::read_dir(source).map_err(|e| Error::io(source, e))? {
        let entry = entry.map_err(|e| Error::io(source, e))?;
        let path = entry.path();
        let destination = target.join(entry.file_name());
        if path.is_dir() {
            copy_dir(&path, &destination)?;
        } else {
            fs::copy(&path, &destination).map_err(|e| Error::io(&path, e))?;
        }
    }
    Ok(())
}
