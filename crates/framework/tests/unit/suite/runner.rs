//! # Runner Tests
//!
//! This module contains unit tests for suite execution. The full
//! compile-run-compare cycle is exercised against fake tools: shell
//! scripts standing in for the cross-compiler, the golden model, and
//! the tested model.

use rvtest_core::suite::runner::failure_dir_name;

#[test]
fn test_failure_dir_name_replaces_special_runs() {
    assert_eq!(
        failure_dir_name("rv32i_i_isa[I-ADD-01.S]"),
        "rv32i_i_isa-I-ADD-01.S"
    );
    assert_eq!(failure_dir_name("group (v2)[t.S]"), "group (v2)-t.S");
    assert_eq!(failure_dir_name("a//b"), "a-b");
}

#[test]
fn test_failure_dir_name_trims_edges() {
    assert_eq!(failure_dir_name("[x]"), "x");
    assert_eq!(failure_dir_name("  spaced  "), "spaced");
    assert_eq!(failure_dir_name("plain_name"), "plain_name");
}

#[cfg(unix)]
mod end_to_end {
    use std::path::Path;

    use rvtest_core::common::{BaseIsa, MemoryRange};
    use rvtest_core::config::RunConfig;
    use rvtest_core::environment::Environment;
    use rvtest_core::plugin::{Plugin, PluginGenerator};
    use rvtest_core::report::TestOutcome;
    use rvtest_core::suite::{builtin_groups, SuiteRunner, TestGroup};
    use rvtest_core::target;
    use tempfile::tempdir;

    use crate::common::fixtures::{subdir, suite_tree};
    use crate::common::tools::{fake_tool, hex_lines, CREATE_OUTPUT, EXTRACT_SIGNATURE};

    /// Words the fake golden model dumps for every test.
    const GOLDEN_WORDS: [u32; 3] = [0x2a, 0xdead_beef, 0];

    /// Writes a fake simulator that honours the `+signature=` convention
    /// and dumps the given words.
    fn signature_tool(dir: &Path, name: &str, words: &[u32]) {
        let body = format!("{EXTRACT_SIGNATURE}\nprintf '{}' > \"$sig\"", hex_lines(words));
        fake_tool(dir, name, &body);
    }

    /// Assembles a runner over fake tools: a toolchain directory with a
    /// compiler and golden model, a tested model dumping `model_words`,
    /// a generated plugin, and a suite tree holding `files`.
    fn make_runner(
        root: &Path,
        model_words: &[u32],
        files: &[&str],
        preserve_failed: bool,
    ) -> SuiteRunner {
        let toolchain = subdir(root, "toolchain");
        fake_tool(&toolchain, "riscv32-unknown-elf-gcc", CREATE_OUTPUT);
        signature_tool(&toolchain, "spike", &GOLDEN_WORDS);

        let models = subdir(root, "models");
        signature_tool(&models, "model", model_words);

        let plugin_dir = root.join("plugin");
        let target = target::find("default").unwrap();
        PluginGenerator::new(target, BaseIsa::Rv32I, MemoryRange::new(0x40_0000, 0, 0))
            .unwrap()
            .generate(&plugin_dir, None)
            .unwrap();
        let plugin = Plugin::open(&plugin_dir).unwrap();

        let reference = Environment::open(subdir(root, "reference")).unwrap();
        let suite = suite_tree(root, files);

        let config = RunConfig {
            work_dir: root.join("run"),
            toolchain: Some(toolchain),
            preserve_failed,
            ..RunConfig::default()
        };
        SuiteRunner::new(&plugin, models.join("model"), reference, suite, config).unwrap()
    }

    #[test]
    fn test_run_passes_on_matching_signatures() {
        let dir = tempdir().unwrap();
        let runner = make_runner(dir.path(), &GOLDEN_WORDS, &["rv32i/I/ISA/I-ADD-01.S"], true);
        let report = runner.run().unwrap();

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.skipped(), 10);
        assert!(report.is_compliant());

        let passed = report
            .records
            .iter()
            .find(|record| record.outcome.is_passed())
            .unwrap();
        assert_eq!(passed.id, "rv32i_i_isa[I-ADD-01.S]");
        assert_eq!(passed.category, "I");

        assert_eq!(
            report.summary(),
            "RISC-V model with ISA configuration: RV32I\nBase ISA: 1/1 passed (OK)"
        );
    }

    #[test]
    fn test_run_writes_report_file() {
        let dir = tempdir().unwrap();
        let runner = make_runner(dir.path(), &GOLDEN_WORDS, &["rv32i/I/ISA/I-ADD-01.S"], true);
        runner.run().unwrap();

        let path = dir.path().join("run/report/report.json");
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["model_name"], "RISC-V model");
        assert_eq!(value["records"].as_array().unwrap().len(), 11);
    }

    #[test]
    fn test_run_fails_on_differing_signatures() {
        let dir = tempdir().unwrap();
        let runner = make_runner(
            dir.path(),
            &[0x2a, 0xbad, 0],
            &["rv32i/I/ISA/I-ADD-01.S"],
            true,
        );
        let report = runner.run().unwrap();

        assert_eq!(report.failed(), 1);
        assert!(!report.is_compliant());
        let failed = report
            .records
            .iter()
            .find(|record| record.outcome.is_failed())
            .unwrap();
        assert_eq!(
            failed.outcome,
            TestOutcome::Failed(
                "signature mismatch at word 1: expected deadbeef, got 00000bad".to_string()
            )
        );
        assert!(report.summary().contains("(NOT compliant)"));
    }

    #[test]
    fn test_failed_test_artifacts_are_preserved() {
        let dir = tempdir().unwrap();
        let runner = make_runner(dir.path(), &[0x1], &["rv32i/I/ISA/I-ADD-01.S"], true);
        runner.run().unwrap();

        let preserved = dir.path().join("run/failed/rv32i_i_isa-I-ADD-01.S");
        assert!(preserved.is_dir());
        assert!(preserved.join("I-ADD-01.S.ref.xexe.sig").is_file());
    }

    #[test]
    fn test_preservation_can_be_disabled() {
        let dir = tempdir().unwrap();
        let runner = make_runner(dir.path(), &[0x1], &["rv32i/I/ISA/I-ADD-01.S"], false);
        runner.run().unwrap();
        assert!(!dir.path().join("run/failed").exists());
    }

    #[test]
    fn test_empty_groups_report_no_files_found() {
        let dir = tempdir().unwrap();
        let runner = make_runner(dir.path(), &GOLDEN_WORDS, &["rv32i/I/ISA/I-ADD-01.S"], true);
        let report = runner.run().unwrap();

        let skip = report
            .records
            .iter()
            .find(|record| record.id == "rv64i_i_isa")
            .unwrap();
        assert_eq!(skip.outcome, TestOutcome::Skipped("No files found".to_string()));
    }

    #[test]
    fn test_unmet_requirements_skip_discovered_cases() {
        let dir = tempdir().unwrap();
        let runner = make_runner(
            dir.path(),
            &GOLDEN_WORDS,
            &["rv32i/I/ISA/I-ADD-01.S", "rv32i/C/ISA/C-ADD-01.S"],
            true,
        );
        let report = runner.run().unwrap();

        // The compressed group is discovered but the platform lacks C.
        let skip = report
            .records
            .iter()
            .find(|record| record.id == "rv32i_c_isa[C-ADD-01.S]")
            .unwrap();
        assert_eq!(
            skip.outcome,
            TestOutcome::Skipped("Test requires extension(s) C".to_string())
        );
        assert_eq!(report.passed(), 1);
        assert_eq!(report.skipped(), 10);
    }

    #[test]
    fn test_with_groups_restricts_the_run() {
        let dir = tempdir().unwrap();
        let runner = make_runner(dir.path(), &GOLDEN_WORDS, &["rv32i/I/ISA/I-ADD-01.S"], true);
        let groups: Vec<TestGroup> = builtin_groups()
            .into_iter()
            .filter(|group| group.name() == "rv32i_i_isa")
            .collect();
        let report = runner.with_groups(groups).run().unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.passed(), 1);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn test_header_reports_run_provenance() {
        let dir = tempdir().unwrap();
        let runner = make_runner(dir.path(), &GOLDEN_WORDS, &["rv32i/I/ISA/I-ADD-01.S"], true);
        let header = runner.header();
        assert_eq!(header.isa, "rv32i");
        assert_eq!(header.toolchain, dir.path().join("toolchain"));
        assert_eq!(header.plugin_path, dir.path().join("plugin"));
        assert_eq!(header.model_path, dir.path().join("models/model"));
        assert_eq!(header.reference_environment, dir.path().join("reference"));
    }
}
