//! Structural validation of configuration headers.
//!
//! The checks mirror what the generic skeletons and the external
//! signature checkers rely on:
//! 1. **Surface:** Every required macro exists with the exact arity.
//! 2. **Halt:** `CODE_BEGIN` defines the symbol `HALT` stores to.
//! 3. **Signature:** The region is 4-byte aligned and closed by the
//!    fixed zero-word pad.
//! 4. **Word width:** `__riscv_xlen` is 64 under the 64-bit flag and
//!    32 otherwise.
//! 5. **I/O mode:** Hooks are all empty or all functional, never mixed.

use thiserror::Error;

use super::header::HeaderFile;
use super::surface::{self, MacroSpec, SIGNATURE_ALIGN, SIGNATURE_PAD_WORDS, WORD_WIDTHS};

/// A structural defect found in a configuration header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A required macro is absent.
    #[error("macro {name} is not defined")]
    MissingMacro {
        /// Name of the absent macro.
        name: &'static str,
    },

    /// A required macro exists with the wrong parameter count.
    #[error("macro {name} defined with {}, expected {}", arity_text(*found), arity_text(*expected))]
    ArityMismatch {
        /// Name of the offending macro.
        name: &'static str,
        /// Required parameter count.
        expected: Option<usize>,
        /// Parameter count found in the header.
        found: Option<usize>,
    },

    /// `HALT` contains no symbol-addressed store.
    #[error("HALT does not store to a halt symbol")]
    HaltStoreMissing,

    /// The symbol `HALT` stores to is not defined by `CODE_BEGIN`.
    #[error("halt symbol {symbol} is not defined by CODE_BEGIN")]
    HaltSymbolUndefined {
        /// Symbol the store targets.
        symbol: String,
    },

    /// The signature region is closed by the wrong number of zero words.
    #[error("signature region ends with {found} zero words, expected {SIGNATURE_PAD_WORDS}")]
    SignaturePad {
        /// Zero words found in `DATA_END`.
        found: usize,
    },

    /// A signature boundary macro lacks the alignment directive.
    #[error("{name} lacks a .align {SIGNATURE_ALIGN} directive")]
    SignatureAlignment {
        /// Name of the boundary macro.
        name: &'static str,
    },

    /// The header never defines the word-width constant.
    #[error("__riscv_xlen is not defined")]
    WordWidthMissing,

    /// A word-width value outside the architecture.
    #[error("word width {value} is not one of 32 and 64")]
    WordWidthValue {
        /// The offending value.
        value: u32,
    },

    /// The word-width switch selects the wrong pairing.
    #[error("word width is {flagged} under the 64-bit flag and {default} otherwise, expected 64 and 32")]
    WordWidthSwitch {
        /// Value under the 64-bit flag.
        flagged: u32,
        /// Value without the flag.
        default: u32,
    },

    /// Some I/O hooks are empty while others are functional.
    #[error("I/O hooks mix empty and functional expansions")]
    MixedIoHooks,
}

fn arity_text(arity: Option<usize>) -> String {
    match arity {
        None => "no parameter list".to_string(),
        Some(1) => "1 parameter".to_string(),
        Some(n) => format!("{n} parameters"),
    }
}

/// Checks a parsed `compliance_test.h` against the harness contract.
pub fn check_test_header(header: &HeaderFile) -> Vec<Violation> {
    let mut violations = check_surface(header, &surface::TEST_MACROS);

    // The halt store and its defining label must agree, or a passing
    // test never reaches the harness.
    if let Some(halt) = header.find("RV_COMPLIANCE_HALT") {
        match halt.store_symbol() {
            Some(symbol) => {
                let defined = header
                    .find("RV_COMPLIANCE_CODE_BEGIN")
                    .is_some_and(|begin| begin.labels().contains(&symbol));
                if !defined {
                    violations.push(Violation::HaltSymbolUndefined { symbol });
                }
            }
            None => violations.push(Violation::HaltStoreMissing),
        }
    }

    if let Some(begin) = header.find("RV_COMPLIANCE_DATA_BEGIN") {
        if !begin.alignments().contains(&SIGNATURE_ALIGN) {
            violations.push(Violation::SignatureAlignment {
                name: "RV_COMPLIANCE_DATA_BEGIN",
            });
        }
    }
    if let Some(end) = header.find("RV_COMPLIANCE_DATA_END") {
        if !end.alignments().contains(&SIGNATURE_ALIGN) {
            violations.push(Violation::SignatureAlignment {
                name: "RV_COMPLIANCE_DATA_END",
            });
        }
        let found = end.zero_words();
        if found != SIGNATURE_PAD_WORDS {
            violations.push(Violation::SignaturePad { found });
        }
    }

    match header.word_width {
        Some(width) => {
            for value in [width.flagged, width.default] {
                if !WORD_WIDTHS.contains(&value) {
                    violations.push(Violation::WordWidthValue { value });
                }
            }
            // A constant width covers targets without the 64-bit flag;
            // an actual switch must select 64 over 32.
            if width.flagged != width.default && (width.flagged, width.default) != (64, 32) {
                violations.push(Violation::WordWidthSwitch {
                    flagged: width.flagged,
                    default: width.default,
                });
            }
        }
        None => violations.push(Violation::WordWidthMissing),
    }

    violations
}

/// Checks a parsed `compliance_io.h` against the hook contract.
pub fn check_io_header(header: &HeaderFile) -> Vec<Violation> {
    let mut violations = check_surface(header, &surface::IO_MACROS);

    let hooks: Vec<_> = surface::IO_MACROS
        .iter()
        .filter_map(|spec| header.find(spec.name))
        .collect();
    let empty = hooks.iter().filter(|def| def.is_empty()).count();
    if empty != 0 && empty != hooks.len() {
        violations.push(Violation::MixedIoHooks);
    }

    violations
}

/// Checks that every macro of a surface exists with its exact arity.
fn check_surface(header: &HeaderFile, specs: &[MacroSpec]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for spec in specs {
        match header.find(spec.name) {
            None => violations.push(Violation::MissingMacro { name: spec.name }),
            Some(def) if def.arity() != spec.arity => {
                violations.push(Violation::ArityMismatch {
                    name: spec.name,
                    expected: spec.arity,
                    found: def.arity(),
                });
            }
            Some(_) => {}
        }
    }
    violations
}
