//! The macro surface generic test skeletons expect.
//!
//! Every target supplies twelve expansions, identical in name and
//! arity across targets so the skeletons compile unconditionally: six
//! test macros in `compliance_test.h` and six I/O hooks in
//! `compliance_io.h`. Hook bodies may be empty (non-functional
//! target), but the names must exist.

/// Name and arity of one required macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroSpec {
    /// Macro name as it appears in the header.
    pub name: &'static str,
    /// Required parameter count, `None` for an object-like macro.
    pub arity: Option<usize>,
}

/// The six test macros `compliance_test.h` must define.
pub const TEST_MACROS: [MacroSpec; 6] = [
    MacroSpec {
        name: "RV_COMPLIANCE_HALT",
        arity: None,
    },
    MacroSpec {
        name: "RV_COMPLIANCE_RV32M",
        arity: None,
    },
    MacroSpec {
        name: "RV_COMPLIANCE_CODE_BEGIN",
        arity: None,
    },
    MacroSpec {
        name: "RV_COMPLIANCE_CODE_END",
        arity: None,
    },
    MacroSpec {
        name: "RV_COMPLIANCE_DATA_BEGIN",
        arity: None,
    },
    MacroSpec {
        name: "RV_COMPLIANCE_DATA_END",
        arity: None,
    },
];

/// The six I/O hooks `compliance_io.h` must define.
pub const IO_MACROS: [MacroSpec; 6] = [
    MacroSpec {
        name: "RVTEST_IO_INIT",
        arity: None,
    },
    MacroSpec {
        name: "RVTEST_IO_WRITE_STR",
        arity: Some(1),
    },
    MacroSpec {
        name: "RVTEST_IO_CHECK",
        arity: Some(0),
    },
    MacroSpec {
        name: "RVTEST_IO_ASSERT_GPR_EQ",
        arity: Some(2),
    },
    MacroSpec {
        name: "RVTEST_IO_ASSERT_SFPR_EQ",
        arity: Some(3),
    },
    MacroSpec {
        name: "RVTEST_IO_ASSERT_DFPR_EQ",
        arity: Some(3),
    },
];

/// Alignment of the signature region in bytes.
pub const SIGNATURE_ALIGN: u32 = 4;

/// Zero words closing the signature region.
///
/// External checkers parse `[words…, 0, 0, 0, 0]`; the pad count is
/// part of the binary layout contract.
pub const SIGNATURE_PAD_WORDS: usize = 4;

/// Word widths a target may declare.
pub const WORD_WIDTHS: [u32; 2] = [32, 64];

/// All twelve required macros.
pub fn all() -> impl Iterator<Item = MacroSpec> {
    TEST_MACROS.into_iter().chain(IO_MACROS)
}
