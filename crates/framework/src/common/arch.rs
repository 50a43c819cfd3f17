//! RISC-V architecture vocabulary shared across the framework.
//!
//! This module defines the building blocks a platform description is made of:
//! 1. **Base ISA:** The six RV32/RV64/RV128 integer bases.
//! 2. **Extensions:** Standard single-letter extensions in canonical order.
//! 3. **Privilege modes:** User, supervisor, hypervisor, and machine.
//! 4. **Trap causes:** Exception causes a model may declare support for.
//! 5. **CSRs:** Control and status registers a model may implement.
//! 6. **Memory ranges:** The `(size, program_start, data_start)` triple.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::Error;

/// Base integer instruction set architecture of a RISC-V processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseIsa {
    /// 32-bit embedded base (16 registers).
    Rv32E,
    /// 32-bit integer base.
    Rv32I,
    /// 64-bit embedded base.
    Rv64E,
    /// 64-bit integer base.
    Rv64I,
    /// 128-bit embedded base.
    Rv128E,
    /// 128-bit integer base.
    Rv128I,
}

impl BaseIsa {
    /// Lower-case ISA string, e.g. `rv32i`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rv32E => "rv32e",
            Self::Rv32I => "rv32i",
            Self::Rv64E => "rv64e",
            Self::Rv64I => "rv64i",
            Self::Rv128E => "rv128e",
            Self::Rv128I => "rv128i",
        }
    }

    /// Register width in bits.
    pub fn xlen(self) -> u32 {
        match self {
            Self::Rv32E | Self::Rv32I => 32,
            Self::Rv64E | Self::Rv64I => 64,
            Self::Rv128E | Self::Rv128I => 128,
        }
    }

    /// Base letter (`i` or `e`) contributing to the MISA register value.
    pub fn base_letter(self) -> char {
        match self {
            Self::Rv32E | Self::Rv64E | Self::Rv128E => 'e',
            Self::Rv32I | Self::Rv64I | Self::Rv128I => 'i',
        }
    }
}

impl fmt::Display for BaseIsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseIsa {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rv32e" => Ok(Self::Rv32E),
            "rv32i" => Ok(Self::Rv32I),
            "rv64e" => Ok(Self::Rv64E),
            "rv64i" => Ok(Self::Rv64I),
            "rv128e" => Ok(Self::Rv128E),
            "rv128i" => Ok(Self::Rv128I),
            other => Err(Error::invalid_value(
                other,
                "rv32e, rv32i, rv64e, rv64i, rv128e, rv128i",
            )),
        }
    }
}

/// Standard single-letter RISC-V extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extension {
    /// Integer multiplication and division.
    M,
    /// Atomic instructions.
    A,
    /// Single-precision floating point.
    F,
    /// Double-precision floating point.
    D,
    /// Quad-precision floating point.
    Q,
    /// Decimal floating point.
    L,
    /// Compressed instructions.
    C,
    /// Bit manipulation.
    B,
    /// Dynamically translated languages.
    J,
    /// Transactional memory.
    T,
    /// Packed SIMD.
    P,
    /// Vector operations.
    V,
    /// User-level interrupts.
    N,
}

impl Extension {
    /// All extensions in configuration-string order.
    ///
    /// This is the order extension letters appear in `-march=` and
    /// `--isa=` strings; note that it differs from alphabetical order.
    pub const CANONICAL: [Self; 13] = [
        Self::M,
        Self::A,
        Self::F,
        Self::D,
        Self::Q,
        Self::C,
        Self::L,
        Self::B,
        Self::J,
        Self::T,
        Self::P,
        Self::V,
        Self::N,
    ];

    /// Lower-case letter used in configuration strings.
    pub fn letter(self) -> char {
        match self {
            Self::M => 'm',
            Self::A => 'a',
            Self::F => 'f',
            Self::D => 'd',
            Self::Q => 'q',
            Self::L => 'l',
            Self::C => 'c',
            Self::B => 'b',
            Self::J => 'j',
            Self::T => 't',
            Self::P => 'p',
            Self::V => 'v',
            Self::N => 'n',
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter().to_ascii_uppercase())
    }
}

impl FromStr for Extension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "M" => Ok(Self::M),
            "A" => Ok(Self::A),
            "F" => Ok(Self::F),
            "D" => Ok(Self::D),
            "Q" => Ok(Self::Q),
            "L" => Ok(Self::L),
            "C" => Ok(Self::C),
            "B" => Ok(Self::B),
            "J" => Ok(Self::J),
            "T" => Ok(Self::T),
            "P" => Ok(Self::P),
            "V" => Ok(Self::V),
            "N" => Ok(Self::N),
            other => Err(Error::invalid_value(other, "M, A, F, D, Q, L, C, B, J, T, P, V, N")),
        }
    }
}

/// RISC-V privilege modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivilegeMode {
    /// User mode.
    #[serde(rename = "U")]
    User,
    /// Supervisor mode.
    #[serde(rename = "S")]
    Supervisor,
    /// Hypervisor mode.
    #[serde(rename = "H")]
    Hypervisor,
    /// Machine mode.
    #[serde(rename = "M")]
    Machine,
}

impl PrivilegeMode {
    /// Upper-case mode letter.
    pub fn letter(self) -> char {
        match self {
            Self::User => 'U',
            Self::Supervisor => 'S',
            Self::Hypervisor => 'H',
            Self::Machine => 'M',
        }
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for PrivilegeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "U" | "USER" => Ok(Self::User),
            "S" | "SUPERVISOR" => Ok(Self::Supervisor),
            "H" | "HYPERVISOR" => Ok(Self::Hypervisor),
            "M" | "MACHINE" => Ok(Self::Machine),
            other => Err(Error::invalid_value(other, "U, S, H, M")),
        }
    }
}

/// Exception causes a platform may declare support for.
///
/// Tests exercising a specific trap are skipped on platforms that do not
/// list its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapCause {
    /// Instruction fetch from a misaligned address.
    #[serde(rename = "misaligned fetch")]
    MisalignedFetch,
    /// Instruction access fault.
    #[serde(rename = "fetch access")]
    FetchAccess,
    /// Illegal instruction.
    #[serde(rename = "illegal instruction")]
    IllegalInstruction,
    /// Breakpoint.
    #[serde(rename = "breakpoint")]
    Breakpoint,
    /// Load from a misaligned address.
    #[serde(rename = "misaligned load")]
    MisalignedLoad,
    /// Load access fault.
    #[serde(rename = "load access")]
    LoadAccess,
    /// Store access fault.
    #[serde(rename = "store access")]
    StoreAccess,
    /// Environment call from user mode.
    #[serde(rename = "user_ecall")]
    UserEcall,
    /// Environment call from supervisor mode.
    #[serde(rename = "supervisor_ecall")]
    SupervisorEcall,
    /// Environment call from hypervisor mode.
    #[serde(rename = "hypervisor_ecall")]
    HypervisorEcall,
    /// Environment call from machine mode.
    #[serde(rename = "machine_ecall")]
    MachineEcall,
    /// Instruction page fault.
    #[serde(rename = "fetch page fault")]
    FetchPageFault,
    /// Load page fault.
    #[serde(rename = "load page fault")]
    LoadPageFault,
    /// Store page fault.
    #[serde(rename = "store page fault")]
    StorePageFault,
}

impl TrapCause {
    /// Every cause a platform may declare, in `mcause` order.
    pub const ALL: [Self; 14] = [
        Self::MisalignedFetch,
        Self::FetchAccess,
        Self::IllegalInstruction,
        Self::Breakpoint,
        Self::MisalignedLoad,
        Self::LoadAccess,
        Self::StoreAccess,
        Self::UserEcall,
        Self::SupervisorEcall,
        Self::HypervisorEcall,
        Self::MachineEcall,
        Self::FetchPageFault,
        Self::LoadPageFault,
        Self::StorePageFault,
    ];

    /// Canonical cause name as used in plugin manifests.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MisalignedFetch => "misaligned fetch",
            Self::FetchAccess => "fetch access",
            Self::IllegalInstruction => "illegal instruction",
            Self::Breakpoint => "breakpoint",
            Self::MisalignedLoad => "misaligned load",
            Self::LoadAccess => "load access",
            Self::StoreAccess => "store access",
            Self::UserEcall => "user_ecall",
            Self::SupervisorEcall => "supervisor_ecall",
            Self::HypervisorEcall => "hypervisor_ecall",
            Self::MachineEcall => "machine_ecall",
            Self::FetchPageFault => "fetch page fault",
            Self::LoadPageFault => "load page fault",
            Self::StorePageFault => "store page fault",
        }
    }
}

impl fmt::Display for TrapCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrapCause {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|cause| cause.as_str() == lower)
            .ok_or_else(|| {
                Error::invalid_value(s, "a cause name such as 'illegal instruction' or 'machine_ecall'")
            })
    }
}

/// Control and status registers a platform may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Csr {
    /// Floating-point accrued exceptions.
    Fflags,
    /// Floating-point dynamic rounding mode.
    Frm,
    /// Floating-point control and status.
    Fcsr,
    /// Cycle counter.
    Cycle,
    /// Wall-clock timer.
    Time,
    /// Instructions-retired counter.
    Instret,
    /// Supervisor status.
    Sstatus,
    /// Supervisor interrupt enable.
    Sie,
    /// Supervisor trap vector base address.
    Stvec,
    /// Supervisor counter enable.
    Scounteren,
    /// Supervisor scratch.
    Sscratch,
    /// Supervisor exception program counter.
    Sepc,
    /// Supervisor trap cause.
    Scause,
    /// Supervisor trap value.
    Stval,
    /// Supervisor interrupt pending.
    Sip,
    /// Supervisor address translation and protection.
    Satp,
    /// Machine status.
    Mstatus,
    /// Machine ISA and extensions.
    Misa,
    /// Machine exception delegation.
    Medeleg,
    /// Machine interrupt delegation.
    Mideleg,
    /// Machine interrupt enable.
    Mie,
    /// Machine trap vector base address.
    Mtvec,
    /// Machine counter enable.
    Mcounteren,
    /// Machine scratch.
    Mscratch,
    /// Machine exception program counter.
    Mepc,
    /// Machine trap cause.
    Mcause,
    /// Machine trap value.
    Mtval,
    /// Machine interrupt pending.
    Mip,
    /// Machine cycle counter.
    Mcycle,
    /// Machine instructions-retired counter.
    Minstret,
}

impl Csr {
    /// Every register a platform may declare.
    pub const ALL: [Self; 30] = [
        Self::Fflags,
        Self::Frm,
        Self::Fcsr,
        Self::Cycle,
        Self::Time,
        Self::Instret,
        Self::Sstatus,
        Self::Sie,
        Self::Stvec,
        Self::Scounteren,
        Self::Sscratch,
        Self::Sepc,
        Self::Scause,
        Self::Stval,
        Self::Sip,
        Self::Satp,
        Self::Mstatus,
        Self::Misa,
        Self::Medeleg,
        Self::Mideleg,
        Self::Mie,
        Self::Mtvec,
        Self::Mcounteren,
        Self::Mscratch,
        Self::Mepc,
        Self::Mcause,
        Self::Mtval,
        Self::Mip,
        Self::Mcycle,
        Self::Minstret,
    ];

    /// Lower-case register name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fflags => "fflags",
            Self::Frm => "frm",
            Self::Fcsr => "fcsr",
            Self::Cycle => "cycle",
            Self::Time => "time",
            Self::Instret => "instret",
            Self::Sstatus => "sstatus",
            Self::Sie => "sie",
            Self::Stvec => "stvec",
            Self::Scounteren => "scounteren",
            Self::Sscratch => "sscratch",
            Self::Sepc => "sepc",
            Self::Scause => "scause",
            Self::Stval => "stval",
            Self::Sip => "sip",
            Self::Satp => "satp",
            Self::Mstatus => "mstatus",
            Self::Misa => "misa",
            Self::Medeleg => "medeleg",
            Self::Mideleg => "mideleg",
            Self::Mie => "mie",
            Self::Mtvec => "mtvec",
            Self::Mcounteren => "mcounteren",
            Self::Mscratch => "mscratch",
            Self::Mepc => "mepc",
            Self::Mcause => "mcause",
            Self::Mtval => "mtval",
            Self::Mip => "mip",
            Self::Mcycle => "mcycle",
            Self::Minstret => "minstret",
        }
    }
}

impl fmt::Display for Csr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Csr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|csr| csr.as_str() == lower)
            .ok_or_else(|| {
                Error::invalid_value(s, "a register name such as 'mstatus' or 'fflags'")
            })
    }
}

/// Memory configuration of a tested platform.
///
/// The triple mirrors the `(size, program_start, data_start)` form used
/// in plugin manifests. Both start addresses are offsets that must fall
/// inside the memory of `size` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRange {
    /// Total memory size in bytes. Must be greater than zero.
    pub size: u64,
    /// Start address of the program region.
    pub program_start: u64,
    /// Start address of the data region.
    pub data_start: u64,
}

impl MemoryRange {
    /// Creates a memory range without validating it.
    pub fn new(size: u64, program_start: u64, data_start: u64) -> Self {
        Self {
            size,
            program_start,
            data_start,
        }
    }

    /// Checks the range invariants.
    ///
    /// Size must be greater than zero and both start addresses must lie
    /// within `[0, size)`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.size == 0 || self.program_start >= self.size || self.data_start >= self.size {
            return Err(Error::Platform {
                reason: format!(
                    "invalid memory range ({}, {}, {}): size must be > 0, \
                     and program and data address must be within range",
                    self.size, self.program_start, self.data_start
                ),
            });
        }
        Ok(())
    }
}

impl FromStr for MemoryRange {
    type Err = Error;

    /// Parses a `size,program_start,data_start` triple.
    ///
    /// Each component accepts decimal or `0x`-prefixed hexadecimal; an
    /// empty component is treated as zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(Error::Platform {
                reason: format!(
                    "memory range '{s}' must be a triplet <size,program_start,data_start>"
                ),
            });
        }
        let range = Self::new(
            parse_address(parts[0])?,
            parse_address(parts[1])?,
            parse_address(parts[2])?,
        );
        range.validate()?;
        Ok(range)
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal address. Empty input is zero.
fn parse_address(s: &str) -> Result<u64, Error> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse::<u64>()
    };
    parsed.map_err(|_| Error::invalid_value(s, "a decimal or 0x-prefixed number"))
}
