//! # Generator Tests
//!
//! This module contains unit tests for plugin generation: staging,
//! manifest defaults, model-name precedence, and header provisioning.

use std::fs;

use rvtest_core::common::{BaseIsa, Error, Extension, MemoryRange, PrivilegeMode};
use rvtest_core::environment::Environment;
use rvtest_core::plugin::generator::DEFAULT_MODEL_NAME;
use rvtest_core::plugin::{PluginGenerator, PluginManifest};
use rvtest_core::target::{self, templates, CompilerProfile, ModelInterface};
use tempfile::tempdir;

use crate::common::fixtures::{full_environment, write_file};

const MEMORY: MemoryRange = MemoryRange {
    size: 0x40_0000,
    program_start: 0,
    data_start: 0,
};

fn generator(target_name: &str) -> PluginGenerator {
    let target = target::find(target_name).unwrap();
    PluginGenerator::new(target, BaseIsa::Rv32I, MEMORY).unwrap()
}

#[test]
fn test_new_rejects_invalid_memory() {
    let target = target::find("default").unwrap();
    let result = PluginGenerator::new(target, BaseIsa::Rv32I, MemoryRange::new(0, 0, 0));
    assert!(result.is_err());
}

#[test]
fn test_generate_writes_plugin_layout() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    generator("default").generate(&output, None).unwrap();

    assert!(output.join("plugin.json").is_file());
    assert!(output.join("environment/include").is_dir());
    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.target, "default");
    assert_eq!(manifest.interface, ModelInterface::Reference);
    assert_eq!(manifest.compiler, CompilerProfile::Reference);
}

#[test]
fn test_generate_defaults_behavior_switches() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    generator("default").generate(&output, None).unwrap();

    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.platform.misaligned, Some(false));
    assert_eq!(manifest.platform.interrupt_support, Some(false));
}

#[test]
fn test_generate_keeps_declared_behavior() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    let mut generator = generator("default");
    generator.misaligned(true).interrupts(true);
    generator.generate(&output, None).unwrap();

    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.platform.misaligned, Some(true));
    assert_eq!(manifest.platform.interrupt_support, Some(true));
}

#[test]
fn test_generate_stages_platform_properties() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    let mut generator = generator("default");
    generator
        .extension(Extension::M)
        .extension(Extension::C)
        .extension(Extension::M)
        .mode(PrivilegeMode::Machine);
    generator.generate(&output, None).unwrap();

    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.platform.extensions, vec![Extension::M, Extension::C]);
    assert_eq!(manifest.platform.configuration_string(), "rv32imc");
    assert!(manifest.platform.has_mode(PrivilegeMode::Machine));
}

#[test]
fn test_remove_extension_unstages() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    let mut generator = generator("default");
    generator.extension(Extension::M).remove_extension(Extension::M);
    generator.generate(&output, None).unwrap();

    let manifest = PluginManifest::load(&output).unwrap();
    assert!(manifest.platform.extensions.is_empty());
}

#[test]
fn test_default_model_name() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    generator("default").generate(&output, None).unwrap();
    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.name, DEFAULT_MODEL_NAME);
}

#[test]
fn test_configured_model_name() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    let mut generator = generator("default");
    generator.model_name("my core");
    generator.generate(&output, None).unwrap();
    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.name, "my core");
}

#[test]
fn test_target_fixed_model_name_wins() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    let mut generator = generator("riscv-ovpsim");
    generator.model_name("ignored");
    generator.generate(&output, None).unwrap();
    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.name, "OVPsim");
    assert_eq!(manifest.interface, ModelInterface::RiscvOvpsim);
}

#[test]
fn test_target_headers_are_written() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    generator("codasip-sdk").generate(&output, None).unwrap();
    let written =
        fs::read_to_string(output.join("environment/include/compliance_test.h")).unwrap();
    assert_eq!(written, templates::CODASIP_COMPLIANCE_TEST_H);
}

#[test]
fn test_reference_environment_fills_missing_headers() {
    let dir = tempdir().unwrap();
    let reference_root = full_environment(dir.path(), "reference");
    write_file(&reference_root, "include/encoding.h", "#define MSTATUS 0x300\n");
    let reference = Environment::open(&reference_root).unwrap();

    let output = dir.path().join("plugin");
    generator("default").generate(&output, Some(&reference)).unwrap();

    let copied = fs::read_to_string(output.join("environment/include/encoding.h")).unwrap();
    assert_eq!(copied, "#define MSTATUS 0x300\n");
    let env = Environment::open(output.join("environment")).unwrap();
    assert!(env.missing_headers().is_empty());
}

#[test]
fn test_generate_without_reference_leaves_headers_missing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    generator("default").generate(&output, None).unwrap();

    let env = Environment::open(output.join("environment")).unwrap();
    assert_eq!(env.missing_headers().len(), 6);
}

#[test]
fn test_generate_into_existing_file_fails() {
    let dir = tempdir().unwrap();
    let output = write_file(dir.path(), "plugin", "occupied\n");
    let err = generator("default").generate(&output, None).unwrap_err();
    assert!(matches!(err, Error::Generate { .. }));
}

#[test]
fn test_generate_overwrites_existing_directory() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("plugin");
    generator("default").generate(&output, None).unwrap();

    let mut second = generator("default");
    second.model_name("second pass");
    second.generate(&output, None).unwrap();
    let manifest = PluginManifest::load(&output).unwrap();
    assert_eq!(manifest.name, "second pass");
}
