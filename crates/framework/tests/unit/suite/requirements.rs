//! # Requirements Tests
//!
//! This module contains unit tests for platform requirements: admission,
//! skip reasons, evaluation order, and the negated variants.

use rvtest_core::common::{BaseIsa, Csr, Extension, PrivilegeMode, TrapCause};
use rvtest_core::suite::{Admission, Requirements};

use crate::common::fixtures::rv32i_platform;

fn skip_reason(admission: Admission) -> String {
    match admission {
        Admission::Skip(reason) => reason,
        Admission::Run => panic!("expected a skip"),
    }
}

#[test]
fn test_empty_requirements_admit_any_platform() {
    let admission = Requirements::new().check(&rv32i_platform());
    assert!(admission.is_run());
    assert_eq!(admission, Admission::Run);
}

#[test]
fn test_matching_requirements_admit() {
    let mut platform = rv32i_platform();
    platform.add_extension(Extension::M);
    platform.add_mode(PrivilegeMode::Machine);
    let requirements = Requirements::new()
        .isa(BaseIsa::Rv32I)
        .extension(Extension::M)
        .mode(PrivilegeMode::Machine);
    assert!(requirements.check(&platform).is_run());
}

#[test]
fn test_wrong_architecture_skips() {
    let admission = Requirements::new()
        .isa(BaseIsa::Rv64I)
        .check(&rv32i_platform());
    assert_eq!(skip_reason(admission), "Test requires architecture rv64i");
}

#[test]
fn test_missing_extensions_skip_with_list() {
    let admission = Requirements::new()
        .extension(Extension::M)
        .extension(Extension::F)
        .check(&rv32i_platform());
    assert_eq!(skip_reason(admission), "Test requires extension(s) M, F");
}

#[test]
fn test_missing_mode_skips() {
    let admission = Requirements::new()
        .mode(PrivilegeMode::Supervisor)
        .check(&rv32i_platform());
    assert_eq!(skip_reason(admission), "Test requires mode(s) S");
}

#[test]
fn test_insufficient_memory_skips() {
    let admission = Requirements::new()
        .minimum_memory(0x800_0000)
        .check(&rv32i_platform());
    assert_eq!(
        skip_reason(admission),
        "Test minimum memory size 134217728 Bytes"
    );

    let admission = Requirements::new()
        .minimum_memory(0x1000)
        .check(&rv32i_platform());
    assert!(admission.is_run());
}

#[test]
fn test_misaligned_mismatch_skips() {
    let mut platform = rv32i_platform();
    platform.set_misaligned(true);
    let admission = Requirements::new().misaligned(false).check(&platform);
    assert_eq!(
        skip_reason(admission),
        "Test requires misaligned memory access set to false"
    );
}

#[test]
fn test_undeclared_misaligned_admits() {
    // The platform leaves the property unknown; the group runs.
    let admission = Requirements::new()
        .misaligned(false)
        .check(&rv32i_platform());
    assert!(admission.is_run());
}

#[test]
fn test_interrupt_mismatch_skips() {
    let mut platform = rv32i_platform();
    platform.set_interrupt_support(false);
    let admission = Requirements::new()
        .interrupt_support(true)
        .check(&platform);
    assert_eq!(
        skip_reason(admission),
        "Test requires interrupt support set to true"
    );
}

#[test]
fn test_missing_cause_skips() {
    let admission = Requirements::new()
        .cause(TrapCause::IllegalInstruction)
        .cause(TrapCause::Breakpoint)
        .check(&rv32i_platform());
    assert_eq!(
        skip_reason(admission),
        "Test requires following exception(s) support: illegal instruction, breakpoint"
    );
}

#[test]
fn test_missing_csr_skips() {
    let admission = Requirements::new()
        .csr(Csr::Mstatus)
        .check(&rv32i_platform());
    assert_eq!(
        skip_reason(admission),
        "Test requires following control or status register(s) support mstatus"
    );
}

#[test]
fn test_first_unmet_requirement_wins() {
    // Both the extension and the mode are missing; the extension is
    // checked first and names the reason.
    let admission = Requirements::new()
        .mode(PrivilegeMode::Machine)
        .extension(Extension::M)
        .check(&rv32i_platform());
    assert_eq!(skip_reason(admission), "Test requires extension(s) M");
}

#[test]
fn test_skip_isa() {
    let admission = Requirements::new()
        .skip_isa(BaseIsa::Rv32I)
        .check(&rv32i_platform());
    assert_eq!(
        skip_reason(admission),
        "Test is skipped for architecture rv32i"
    );
}

#[test]
fn test_skip_extension_only_when_present() {
    let requirements = Requirements::new().skip_extension(Extension::C);
    assert!(requirements.check(&rv32i_platform()).is_run());

    let mut platform = rv32i_platform();
    platform.add_extension(Extension::C);
    assert_eq!(
        skip_reason(requirements.check(&platform)),
        "Test is skipped for extension(s) C"
    );
}

#[test]
fn test_skip_mode_only_when_present() {
    let requirements = Requirements::new().skip_mode(PrivilegeMode::User);
    assert!(requirements.check(&rv32i_platform()).is_run());

    let mut platform = rv32i_platform();
    platform.add_mode(PrivilegeMode::User);
    assert_eq!(
        skip_reason(requirements.check(&platform)),
        "Test is skipped for mode(s) U"
    );
}
