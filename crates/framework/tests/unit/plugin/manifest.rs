//! # Manifest Tests
//!
//! This module contains unit tests for `plugin.json` loading, saving,
//! and the defaults applied to absent fields.

use rvtest_core::common::{Error, Extension};
use rvtest_core::plugin::{Plugin, PluginManifest};
use rvtest_core::target::{CompilerProfile, ModelInterface};
use tempfile::tempdir;

use crate::common::fixtures::{rv32i_platform, write_file};

fn sample_manifest() -> PluginManifest {
    PluginManifest {
        target: "default".to_string(),
        name: "sample model".to_string(),
        interface: ModelInterface::Reference,
        compiler: CompilerProfile::Reference,
        platform: rv32i_platform(),
    }
}

#[test]
fn test_load_missing_manifest() {
    let dir = tempdir().unwrap();
    let err = PluginManifest::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Manifest { .. }));
}

#[test]
fn test_load_malformed_manifest() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "plugin.json", "{ not json");
    let err = PluginManifest::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Manifest { .. }));
}

#[test]
fn test_load_rejects_invalid_platform() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "plugin.json",
        r#"{
            "target": "default",
            "name": "broken",
            "platform": {
                "isa": "rv32i",
                "memory": { "size": 0, "program_start": 0, "data_start": 0 }
            }
        }"#,
    );
    let err = PluginManifest::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Platform { .. }));
}

#[test]
fn test_load_normalizes_duplicate_extensions() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "plugin.json",
        r#"{
            "target": "default",
            "name": "model",
            "platform": {
                "isa": "rv32i",
                "extensions": ["M", "C", "M"],
                "memory": { "size": 4194304, "program_start": 0, "data_start": 0 }
            }
        }"#,
    );
    let manifest = PluginManifest::load(dir.path()).unwrap();
    assert_eq!(manifest.platform.extensions, vec![Extension::M, Extension::C]);
}

#[test]
fn test_absent_conventions_default_to_reference() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "plugin.json",
        r#"{
            "target": "default",
            "name": "model",
            "platform": {
                "isa": "rv64i",
                "memory": { "size": 4194304, "program_start": 0, "data_start": 0 }
            }
        }"#,
    );
    let manifest = PluginManifest::load(dir.path()).unwrap();
    assert_eq!(manifest.interface, ModelInterface::Reference);
    assert_eq!(manifest.compiler, CompilerProfile::Reference);
}

#[test]
fn test_conventions_parse_kebab_case() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "plugin.json",
        r#"{
            "target": "codasip-sdk",
            "name": "model",
            "interface": "codasip-sdk",
            "compiler": "minimal",
            "platform": {
                "isa": "rv32i",
                "memory": { "size": 4194304, "program_start": 0, "data_start": 0 }
            }
        }"#,
    );
    let manifest = PluginManifest::load(dir.path()).unwrap();
    assert_eq!(manifest.interface, ModelInterface::CodasipSdk);
    assert_eq!(manifest.compiler, CompilerProfile::Minimal);
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempdir().unwrap();
    let mut manifest = sample_manifest();
    manifest.platform.add_extension(Extension::M);
    manifest.save(dir.path()).unwrap();

    let loaded = PluginManifest::load(dir.path()).unwrap();
    assert_eq!(loaded.target, "default");
    assert_eq!(loaded.name, "sample model");
    assert_eq!(loaded.platform, manifest.platform);
}

#[test]
fn test_save_writes_pretty_json() {
    let dir = tempdir().unwrap();
    sample_manifest().save(dir.path()).unwrap();
    let text = std::fs::read_to_string(dir.path().join("plugin.json")).unwrap();
    assert!(text.starts_with("{\n"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_plugin_open_exposes_manifest_and_environment() {
    let dir = tempdir().unwrap();
    sample_manifest().save(dir.path()).unwrap();
    write_file(dir.path(), "environment/include/encoding.h", "");

    let plugin = Plugin::open(dir.path()).unwrap();
    assert_eq!(plugin.root(), dir.path());
    assert_eq!(plugin.manifest().name, "sample model");
    assert_eq!(plugin.platform().configuration_string(), "rv32i");

    let env = plugin.environment().unwrap();
    assert_eq!(
        env.headers().unwrap(),
        vec![dir.path().join("environment/include/encoding.h")]
    );
}

#[test]
fn test_plugin_open_without_environment_dir() {
    let dir = tempdir().unwrap();
    sample_manifest().save(dir.path()).unwrap();
    let plugin = Plugin::open(dir.path()).unwrap();
    assert!(plugin.environment().is_err());
}
