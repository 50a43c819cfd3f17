//! Platform model describing the configuration of a tested processor.
//!
//! A [`Platform`] gathers everything the framework needs to know about the
//! processor under test:
//! 1. **Architecture:** Base ISA, standard extensions, privilege modes.
//! 2. **Memory:** The `(size, program_start, data_start)` range.
//! 3. **Behavior:** Misaligned-access and interrupt support.
//! 4. **Traps and CSRs:** Causes and registers the model implements.
//!
//! The platform serializes as the payload of a plugin manifest and drives
//! both test admission and tool invocation (`-march=`, `--isa=`, MISA).

use serde::{Deserialize, Serialize};

use crate::common::arch::{BaseIsa, Csr, Extension, MemoryRange, PrivilegeMode, TrapCause};
use crate::common::error::Result;

/// Configuration of the processor under test.
///
/// Extension, mode, cause, and CSR collections keep insertion order and
/// reject duplicates; the serialized form is part of the plugin manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Base integer ISA.
    pub isa: BaseIsa,

    /// Standard extensions the model implements.
    #[serde(default)]
    pub extensions: Vec<Extension>,

    /// Privilege modes the model implements.
    #[serde(default)]
    pub modes: Vec<PrivilegeMode>,

    /// Memory range of the model.
    pub memory: MemoryRange,

    /// Whether misaligned data accesses are handled in hardware.
    /// `None` means unknown; admission checks then pass.
    #[serde(default)]
    pub misaligned: Option<bool>,

    /// Whether interrupts are supported. `None` means unknown.
    #[serde(default)]
    pub interrupt_support: Option<bool>,

    /// Exception causes the model supports.
    #[serde(default)]
    pub causes: Vec<TrapCause>,

    /// Control and status registers the model implements.
    #[serde(default)]
    pub csrs: Vec<Csr>,
}

impl Platform {
    /// Creates a platform with the two required properties set and
    /// everything else empty.
    pub fn new(isa: BaseIsa, memory: MemoryRange) -> Self {
        Self {
            isa,
            extensions: Vec::new(),
            modes: Vec::new(),
            memory,
            misaligned: None,
            interrupt_support: None,
            causes: Vec::new(),
            csrs: Vec::new(),
        }
    }

    /// Adds an extension. Returns `false` when it was already present.
    pub fn add_extension(&mut self, extension: Extension) -> bool {
        push_unique(&mut self.extensions, extension)
    }

    /// Removes an extension. Returns `false` when it was not present.
    pub fn remove_extension(&mut self, extension: Extension) -> bool {
        remove_value(&mut self.extensions, extension)
    }

    /// Adds a privilege mode. Returns `false` when it was already present.
    pub fn add_mode(&mut self, mode: PrivilegeMode) -> bool {
        push_unique(&mut self.modes, mode)
    }

    /// Adds a supported exception cause. Returns `false` on duplicates.
    pub fn add_cause(&mut self, cause: TrapCause) -> bool {
        push_unique(&mut self.causes, cause)
    }

    /// Adds an implemented CSR. Returns `false` on duplicates.
    pub fn add_csr(&mut self, csr: Csr) -> bool {
        push_unique(&mut self.csrs, csr)
    }

    /// Replaces the memory range after validating it.
    pub fn set_memory(&mut self, memory: MemoryRange) -> Result<()> {
        memory.validate()?;
        self.memory = memory;
        Ok(())
    }

    /// Declares misaligned-access support.
    pub fn set_misaligned(&mut self, supported: bool) {
        self.misaligned = Some(supported);
    }

    /// Declares interrupt support.
    pub fn set_interrupt_support(&mut self, supported: bool) {
        self.interrupt_support = Some(supported);
    }

    /// Whether the platform implements the given extension.
    pub fn has_extension(&self, extension: Extension) -> bool {
        self.extensions.contains(&extension)
    }

    /// Whether the platform implements the given privilege mode.
    pub fn has_mode(&self, mode: PrivilegeMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Whether the platform supports the given exception cause.
    pub fn has_cause(&self, cause: TrapCause) -> bool {
        self.causes.contains(&cause)
    }

    /// Whether the platform implements the given CSR.
    pub fn has_csr(&self, csr: Csr) -> bool {
        self.csrs.contains(&csr)
    }

    /// Builds the configuration string from the ISA and extensions.
    ///
    /// The string is all lower case, starts with the base ISA, and lists
    /// extension letters in canonical order (`m a f d q c l b j t p v n`).
    /// It is used verbatim for `-march=` and `--isa=`.
    pub fn configuration_string(&self) -> String {
        let mut out = String::from(self.isa.as_str());
        for extension in Extension::CANONICAL {
            if self.has_extension(extension) {
                out.push(extension.letter());
            }
        }
        out
    }

    /// Computes the MISA register value for this platform.
    ///
    /// One bit per letter, bit 0 being `A`: the base letter (`i` or `e`),
    /// each configured extension, and each configured privilege mode other
    /// than machine mode contribute their letter's bit.
    pub fn misa(&self) -> u32 {
        let mut value = 1u32 << letter_bit(self.isa.base_letter());
        for extension in &self.extensions {
            value |= 1 << letter_bit(extension.letter());
        }
        for mode in &self.modes {
            if *mode != PrivilegeMode::Machine {
                value |= 1 << letter_bit(mode.letter().to_ascii_lowercase());
            }
        }
        value
    }

    /// MISA value formatted as `0x`-prefixed lower-case hexadecimal.
    pub fn misa_hex(&self) -> String {
        format!("{:#x}", self.misa())
    }

    /// Validates the platform invariants.
    pub fn validate(&self) -> Result<()> {
        self.memory.validate()
    }

    /// Removes duplicate entries from all collections, keeping the first
    /// occurrence. Deserialized manifests are normalized before use.
    pub fn normalize(&mut self) {
        dedup_in_place(&mut self.extensions);
        dedup_in_place(&mut self.modes);
        dedup_in_place(&mut self.causes);
        dedup_in_place(&mut self.csrs);
    }
}

/// Bit position of a lower-case letter, `a` being bit 0.
fn letter_bit(letter: char) -> u32 {
    u32::from(letter as u8 - b'a')
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) -> bool {
    if values.contains(&value) {
        return false;
    }
    values.push(value);
    true
}

fn remove_value<T: PartialEq>(values: &mut Vec<T>, value: T) -> bool {
    match values.iter().position(|v| *v == value) {
        Some(index) => {
            values.remove(index);
            true
        }
        None => false,
    }
}

fn dedup_in_place<T: PartialEq + Copy>(values: &mut Vec<T>) {
    let mut seen: Vec<T> = Vec::with_capacity(values.len());
    values.retain(|v| {
        if seen.contains(v) {
            false
        } else {
            seen.push(*v);
            true
        }
    });
}
