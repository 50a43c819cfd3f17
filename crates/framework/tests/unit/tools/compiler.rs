//! # Compiler Invocation Tests
//!
//! This module contains unit tests for the argument vectors the two
//! compilation profiles produce, driven through a fake GCC that records
//! its command line.

use std::path::{Path, PathBuf};

use rvtest_core::common::{BaseIsa, Error, Extension, MemoryRange};
use rvtest_core::environment::Environment;
use rvtest_core::platform::Platform;
use rvtest_core::target::CompilerProfile;
use rvtest_core::tools::compiler::RiscvCompiler;
use tempfile::TempDir;

use crate::common::fixtures::{full_environment, rv32i_platform, write_file};
use crate::common::tools::{capture_line, captured_args, fake_tool, CREATE_OUTPUT};

/// A fake GCC recording its arguments and honoring `-o`.
fn fake_gcc(dir: &Path, capture: &Path) -> PathBuf {
    let body = format!("{}\n{CREATE_OUTPUT}", capture_line(capture));
    fake_tool(dir, "riscv64-unknown-elf-gcc", &body)
}

struct CompileSetup {
    _dir: TempDir,
    capture: PathBuf,
    gcc: PathBuf,
    environment: Environment,
    source: PathBuf,
    output: PathBuf,
}

fn setup() -> CompileSetup {
    let dir = TempDir::new().unwrap();
    let capture = dir.path().join("gcc_args.txt");
    let gcc = fake_gcc(dir.path(), &capture);
    let environment = Environment::open(full_environment(dir.path(), "env")).unwrap();
    let source = write_file(dir.path(), "I-ADD-01.S", "// stub test source\n");
    let output = dir.path().join("I-ADD-01.S.ref.xexe");
    CompileSetup {
        _dir: dir,
        capture,
        gcc,
        environment,
        source,
        output,
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn test_profile_names() {
    let setup = setup();
    let reference = RiscvCompiler::new(&setup.gcc, CompilerProfile::Reference).unwrap();
    assert_eq!(reference.name(), "RISC-V GCC compiler");
    let minimal = RiscvCompiler::new(&setup.gcc, CompilerProfile::Minimal).unwrap();
    assert_eq!(minimal.name(), "User compiler");
}

#[test]
fn test_reference_invocation() {
    let setup = setup();
    let compiler = RiscvCompiler::new(&setup.gcc, CompilerProfile::Reference).unwrap();
    compiler
        .compile(
            &setup.source,
            &setup.output,
            &setup.environment,
            &rv32i_platform(),
            "rv32i",
        )
        .unwrap();
    assert_eq!(
        captured_args(&setup.capture),
        vec![
            display(&setup.source),
            "-static".to_string(),
            "-mcmodel=medany".to_string(),
            "-nostartfiles".to_string(),
            "-fvisibility=hidden".to_string(),
            "-march=rv32i".to_string(),
            "-mabi=ilp32".to_string(),
            "-I".to_string(),
            display(&setup.environment.include_dir()),
            "-o".to_string(),
            display(&setup.output),
        ]
    );
    assert!(setup.output.exists());
}

#[test]
fn test_compressed_dropped_for_plain_tests() {
    let setup = setup();
    let mut platform = rv32i_platform();
    platform.add_extension(Extension::M);
    platform.add_extension(Extension::C);
    let compiler = RiscvCompiler::new(&setup.gcc, CompilerProfile::Reference).unwrap();
    compiler
        .compile(
            &setup.source,
            &setup.output,
            &setup.environment,
            &platform,
            "rv32i",
        )
        .unwrap();
    let args = captured_args(&setup.capture);
    assert!(args.contains(&"-march=rv32im".to_string()));
}

#[test]
fn test_compressed_kept_for_compressed_tests() {
    let setup = setup();
    let mut platform = rv32i_platform();
    platform.add_extension(Extension::M);
    platform.add_extension(Extension::C);
    let compiler = RiscvCompiler::new(&setup.gcc, CompilerProfile::Reference).unwrap();
    compiler
        .compile(
            &setup.source,
            &setup.output,
            &setup.environment,
            &platform,
            "rv32imc",
        )
        .unwrap();
    let args = captured_args(&setup.capture);
    assert!(args.contains(&"-march=rv32imc".to_string()));
}

#[test]
fn test_64_bit_abi() {
    let setup = setup();
    let platform = Platform::new(BaseIsa::Rv64I, MemoryRange::new(0x40_0000, 0, 0));
    let compiler = RiscvCompiler::new(&setup.gcc, CompilerProfile::Reference).unwrap();
    compiler
        .compile(
            &setup.source,
            &setup.output,
            &setup.environment,
            &platform,
            "rv64i",
        )
        .unwrap();
    let args = captured_args(&setup.capture);
    assert!(args.contains(&"-march=rv64i".to_string()));
    assert!(args.contains(&"-mabi=lp64".to_string()));
    assert!(!args.contains(&"-mabi=ilp32".to_string()));
}

#[test]
fn test_linker_script_appended() {
    let setup = setup();
    let script = write_file(setup.environment.root(), "link.ld", "SECTIONS { }\n");
    let compiler = RiscvCompiler::new(&setup.gcc, CompilerProfile::Reference).unwrap();
    compiler
        .compile(
            &setup.source,
            &setup.output,
            &setup.environment,
            &rv32i_platform(),
            "rv32i",
        )
        .unwrap();
    let args = captured_args(&setup.capture);
    let position = args.iter().position(|arg| arg == "-T").unwrap();
    assert_eq!(args[position + 1], display(&script));
    assert_eq!(args[position + 2], "-o");
}

#[test]
fn test_minimal_invocation() {
    let setup = setup();
    let compiler = RiscvCompiler::new(&setup.gcc, CompilerProfile::Minimal).unwrap();
    compiler
        .compile(
            &setup.source,
            &setup.output,
            &setup.environment,
            &rv32i_platform(),
            "rv32i",
        )
        .unwrap();
    assert_eq!(
        captured_args(&setup.capture),
        vec![
            display(&setup.source),
            "-nostdlib".to_string(),
            "-I".to_string(),
            display(&setup.environment.include_dir()),
            "-o".to_string(),
            display(&setup.output),
        ]
    );
}

#[test]
fn test_compile_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let gcc = fake_tool(
        dir.path(),
        "riscv64-unknown-elf-gcc",
        "echo 'unknown ABI' >&2\nexit 1",
    );
    let environment = Environment::open(full_environment(dir.path(), "env")).unwrap();
    let source = write_file(dir.path(), "I-ADD-01.S", "");
    let compiler = RiscvCompiler::new(&gcc, CompilerProfile::Reference).unwrap();
    let err = compiler
        .compile(
            &source,
            &dir.path().join("out.xexe"),
            &environment,
            &rv32i_platform(),
            "rv32i",
        )
        .unwrap_err();
    assert!(matches!(err, Error::ToolFailed { code: 1, .. }));
    assert_eq!(
        err.to_string(),
        "RISC-V GCC compiler failed with exit code 1: unknown ABI"
    );
}
