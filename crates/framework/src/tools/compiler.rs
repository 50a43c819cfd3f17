//! RISC-V GCC invocations.
//!
//! Both execution sides compile the same assembly source against their
//! own environment. The reference side always uses the full flag set
//! below; the tested side uses either the same profile or the minimal
//! `-nostdlib` profile, as declared by the plugin.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::common::error::Result;
use crate::environment::Environment;
use crate::platform::Platform;
use crate::target::CompilerProfile;
use crate::tools::Tool;

/// Flags every reference compilation is invoked with.
const REFERENCE_FLAGS: [&str; 4] = [
    "-static",
    "-mcmodel=medany",
    "-nostartfiles",
    "-fvisibility=hidden",
];

/// Compilation time budget.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A GCC cross-compiler wrapper for one execution side.
#[derive(Debug, Clone)]
pub struct RiscvCompiler {
    tool: Tool,
    profile: CompilerProfile,
    timeout: Duration,
}

impl RiscvCompiler {
    /// Wraps the compiler executable with the given profile.
    pub fn new(executable: impl AsRef<Path>, profile: CompilerProfile) -> Result<Self> {
        let name = match profile {
            CompilerProfile::Reference => "RISC-V GCC compiler",
            CompilerProfile::Minimal => "User compiler",
        };
        Ok(Self {
            tool: Tool::new(executable)?.with_name(name),
            profile,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Replaces the compile time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Display name of the underlying tool.
    pub fn name(&self) -> &str {
        self.tool.name()
    }

    /// Compiles one assembly source into an executable.
    ///
    /// `march` is the ISA the test itself was written for (its group's
    /// `-march` metadata); the platform's configuration string is what
    /// gets compiled for, with `c` dropped when the test does not use
    /// compressed instructions.
    pub fn compile(
        &self,
        source: &Path,
        output: &Path,
        environment: &Environment,
        platform: &Platform,
        march: &str,
    ) -> Result<()> {
        let mut args: Vec<OsString> = vec![source.into()];

        match self.profile {
            CompilerProfile::Reference => {
                args.extend(REFERENCE_FLAGS.iter().map(OsString::from));
                let mut configuration = platform.configuration_string();
                // GCC emits compressed instructions whenever the march
                // carries `c`; tests not written for them must not see it.
                if !march.contains('c') {
                    configuration = configuration.replace('c', "");
                }
                args.push(format!("-march={configuration}").into());
                if march.contains("64") {
                    args.push("-mabi=lp64".into());
                } else {
                    args.push("-mabi=ilp32".into());
                }
            }
            CompilerProfile::Minimal => {
                args.push("-nostdlib".into());
            }
        }

        args.push("-I".into());
        args.push(environment.include_dir().into());

        if let Some(script) = environment.linker_script()? {
            args.push("-T".into());
            args.push(script.into());
        }

        args.push("-o".into());
        args.push(output.into());

        self.tool.run(args, self.timeout)?;
        Ok(())
    }
}
