//! Framework-wide constants for plugin layout, file naming, and discovery.

/// Header files every usable compilation environment must provide.
///
/// Test assemblies include these headers; compilation fails without them.
pub const MANDATORY_HEADERS: [&str; 6] = [
    "encoding.h",
    "riscv_test.h",
    "compliance_io.h",
    "compliance_test.h",
    "test_macros.h",
    "aw_test_macros.h",
];

/// File name of the test-macro header.
pub const TEST_HEADER_FILE: &str = "compliance_test.h";

/// File name of the I/O-hook header.
pub const IO_HEADER_FILE: &str = "compliance_io.h";

/// File name of the manifest inside a valid plugin directory.
pub const PLUGIN_MANIFEST: &str = "plugin.json";

/// Directory inside a plugin holding compilation inputs.
pub const ENVIRONMENT_DIR: &str = "environment";

/// Directory inside an environment holding header files.
pub const INCLUDE_DIR: &str = "include";

/// Suffix of header files.
pub const HEADER_SUFFIX: &str = ".h";

/// Suffix of linker scripts.
pub const LDSCRIPT_SUFFIX: &str = ".ld";

/// Suffix of assembly test sources.
pub const SOURCE_SUFFIX: &str = ".S";

/// Environment variable pointing at an installed RISC-V toolchain root.
pub const RISCV_ENV: &str = "RISCV";

/// Subdirectory of the run work dir holding per-test scratch space.
pub const WORK_SUBDIR: &str = "work";

/// Subdirectory of the run work dir preserving artifacts of failed tests.
pub const FAILED_SUBDIR: &str = "failed";

/// Subdirectory of the run work dir receiving the JSON report.
pub const REPORT_SUBDIR: &str = "report";

/// Signature file written by simulators that dump to a fixed name.
pub const SIGNATURE_FILE: &str = "test_signature.sig";

/// Hex image file produced for hex-loading simulators.
pub const PROGRAM_HEX: &str = "program.hex";

/// Suffix of executables compiled for the reference model.
pub const REF_EXE_SUFFIX: &str = ".ref.xexe";

/// Suffix of executables compiled for the tested model.
pub const DUT_EXE_SUFFIX: &str = ".test.xexe";

/// Suffix of signature files derived from an executable path.
pub const SIG_SUFFIX: &str = ".sig";
