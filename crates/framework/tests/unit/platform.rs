//! # Platform Tests
//!
//! This module contains unit tests for the platform model: configuration
//! strings, MISA computation, collection handling, and serialization.

use rvtest_core::common::{BaseIsa, Csr, Extension, MemoryRange, PrivilegeMode, TrapCause};
use rvtest_core::platform::Platform;

use crate::common::fixtures::rv32i_platform;

#[test]
fn test_new_platform_is_bare() {
    let platform = rv32i_platform();
    assert_eq!(platform.isa, BaseIsa::Rv32I);
    assert!(platform.extensions.is_empty());
    assert!(platform.modes.is_empty());
    assert_eq!(platform.misaligned, None);
    assert_eq!(platform.interrupt_support, None);
}

#[test]
fn test_configuration_string_without_extensions() {
    assert_eq!(rv32i_platform().configuration_string(), "rv32i");
}

#[test]
fn test_configuration_string_uses_canonical_order() {
    let mut platform = rv32i_platform();
    platform.add_extension(Extension::C);
    platform.add_extension(Extension::M);
    platform.add_extension(Extension::A);
    assert_eq!(platform.configuration_string(), "rv32imac");
}

#[test]
fn test_add_extension_rejects_duplicates() {
    let mut platform = rv32i_platform();
    assert!(platform.add_extension(Extension::M));
    assert!(!platform.add_extension(Extension::M));
    assert_eq!(platform.extensions, vec![Extension::M]);
}

#[test]
fn test_remove_extension() {
    let mut platform = rv32i_platform();
    platform.add_extension(Extension::M);
    assert!(platform.remove_extension(Extension::M));
    assert!(!platform.remove_extension(Extension::M));
    assert!(!platform.has_extension(Extension::M));
}

#[test]
fn test_add_mode_and_queries() {
    let mut platform = rv32i_platform();
    assert!(platform.add_mode(PrivilegeMode::Machine));
    assert!(!platform.add_mode(PrivilegeMode::Machine));
    assert!(platform.has_mode(PrivilegeMode::Machine));
    assert!(!platform.has_mode(PrivilegeMode::User));
}

#[test]
fn test_add_cause_and_csr() {
    let mut platform = rv32i_platform();
    assert!(platform.add_cause(TrapCause::IllegalInstruction));
    assert!(platform.add_csr(Csr::Mstatus));
    assert!(platform.has_cause(TrapCause::IllegalInstruction));
    assert!(platform.has_csr(Csr::Mstatus));
    assert!(!platform.has_cause(TrapCause::Breakpoint));
    assert!(!platform.has_csr(Csr::Mtvec));
}

#[test]
fn test_set_memory_validates() {
    let mut platform = rv32i_platform();
    assert!(platform.set_memory(MemoryRange::new(0, 0, 0)).is_err());
    assert!(
        platform
            .set_memory(MemoryRange::new(0x8000, 0x100, 0x200))
            .is_ok()
    );
    assert_eq!(platform.memory.size, 0x8000);
}

#[test]
fn test_behavior_setters() {
    let mut platform = rv32i_platform();
    platform.set_misaligned(true);
    platform.set_interrupt_support(false);
    assert_eq!(platform.misaligned, Some(true));
    assert_eq!(platform.interrupt_support, Some(false));
}

#[test]
fn test_misa_for_base_only() {
    // Bit 8 for the base letter `i`.
    assert_eq!(rv32i_platform().misa(), 0x100);
}

#[test]
fn test_misa_includes_extensions_and_lesser_modes() {
    let mut platform = rv32i_platform();
    platform.add_extension(Extension::M);
    platform.add_extension(Extension::C);
    platform.add_mode(PrivilegeMode::Machine);
    platform.add_mode(PrivilegeMode::User);
    platform.add_mode(PrivilegeMode::Supervisor);
    // i + m + c + u + s; machine mode carries no bit.
    assert_eq!(platform.misa(), 0x0014_1104);
    assert_eq!(platform.misa_hex(), "0x141104");
}

#[test]
fn test_normalize_keeps_first_occurrence() {
    let mut platform = rv32i_platform();
    platform.extensions = vec![Extension::M, Extension::C, Extension::M];
    platform.modes = vec![PrivilegeMode::User, PrivilegeMode::User];
    platform.normalize();
    assert_eq!(platform.extensions, vec![Extension::M, Extension::C]);
    assert_eq!(platform.modes, vec![PrivilegeMode::User]);
}

#[test]
fn test_validate_checks_memory() {
    let mut platform = rv32i_platform();
    assert!(platform.validate().is_ok());
    platform.memory = MemoryRange::new(0x100, 0x200, 0);
    assert!(platform.validate().is_err());
}

#[test]
fn test_serde_round_trip() {
    let mut platform = rv32i_platform();
    platform.add_extension(Extension::M);
    platform.add_mode(PrivilegeMode::Machine);
    platform.set_misaligned(false);
    let json = serde_json::to_string(&platform).unwrap();
    let back: Platform = serde_json::from_str(&json).unwrap();
    assert_eq!(back, platform);
}

#[test]
fn test_deserialize_defaults_optional_collections() {
    let json = r#"{
        "isa": "rv32i",
        "memory": { "size": 4194304, "program_start": 0, "data_start": 0 }
    }"#;
    let platform: Platform = serde_json::from_str(json).unwrap();
    assert!(platform.extensions.is_empty());
    assert!(platform.modes.is_empty());
    assert!(platform.causes.is_empty());
    assert!(platform.csrs.is_empty());
    assert_eq!(platform.misaligned, None);
}
