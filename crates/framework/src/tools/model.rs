//! Golden-model and tested-model execution.
//!
//! The golden model is Spike; it carries no configuration of its own and
//! mirrors the tested platform's. The tested model is the user's
//! executable, driven with whichever convention the plugin declares.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::constants::{PROGRAM_HEX, SIG_SUFFIX, SIGNATURE_FILE};
use crate::common::error::{Error, Result};
use crate::platform::Platform;
use crate::sig::{elf, Signature};
use crate::target::ModelInterface;
use crate::tools::Tool;

/// Simulation time budget per test.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Converter producing hex images for hex-loading conventions.
const ELF2HEX: &str = "elf2hex";

/// Appends `.sig` to an executable path.
fn signature_path(executable: &Path) -> PathBuf {
    let mut path = executable.as_os_str().to_os_string();
    path.push(SIG_SUFFIX);
    PathBuf::from(path)
}

/// The reference simulator.
#[derive(Debug, Clone)]
pub struct GoldenModel {
    tool: Tool,
    timeout: Duration,
}

impl GoldenModel {
    /// Wraps the Spike executable.
    pub fn new(executable: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            tool: Tool::new(executable)?.with_name("spike"),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Replaces the simulation time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Simulates a compiled test and returns its signature.
    pub fn run(&self, executable: &Path, platform: &Platform) -> Result<Signature> {
        let sig_file = signature_path(executable);
        let args: Vec<OsString> = vec![
            format!("--isa={}", platform.configuration_string()).into(),
            format!("+signature={}", sig_file.display()).into(),
            executable.into(),
        ];
        self.tool.run(args, self.timeout)?;
        Signature::from_file(&sig_file)
    }
}

/// The tested model.
#[derive(Debug, Clone)]
pub struct DutModel {
    tool: Tool,
    interface: ModelInterface,
    timeout: Duration,
    elf2hex: Option<PathBuf>,
}

impl DutModel {
    /// Wraps the model executable with its manifest-declared conventions.
    pub fn new(
        executable: impl AsRef<Path>,
        name: impl Into<String>,
        interface: ModelInterface,
    ) -> Result<Self> {
        Ok(Self {
            tool: Tool::new(executable)?.with_name(name),
            interface,
            timeout: DEFAULT_TIMEOUT,
            elf2hex: None,
        })
    }

    /// Replaces the simulation time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the location of the `elf2hex` converter.
    ///
    /// Hex-loading conventions look the converter up on `PATH` by
    /// default.
    pub fn with_elf2hex(mut self, path: impl Into<PathBuf>) -> Self {
        self.elf2hex = Some(path.into());
        self
    }

    /// Display name of the model.
    pub fn name(&self) -> &str {
        self.tool.name()
    }

    /// Executes a compiled test and returns the model's signature.
    ///
    /// `work_dir` is the per-test scratch directory; conventions that
    /// dump their signature to a fixed file name write it there.
    pub fn run(
        &self,
        executable: &Path,
        platform: &Platform,
        work_dir: &Path,
    ) -> Result<Signature> {
        let tool = self.tool.clone().with_work_dir(work_dir);
        match self.interface {
            ModelInterface::CodasipSdk => {
                let args: Vec<OsString> =
                    vec!["-r".into(), executable.into(), "--info".into(), "5".into()];
                let output = tool.run(args, self.timeout)?;
                Signature::parse(Path::new("stdout"), &output.stdout)
            }
            ModelInterface::Ri5cyVerilator => {
                let bounds = elf::signature_bounds(executable)?;
                let hex_image = work_dir.join(PROGRAM_HEX);
                let elf2hex = match &self.elf2hex {
                    Some(path) => Tool::new(path)?,
                    None => Tool::new(ELF2HEX)?,
                };
                let converted = elf2hex.run(
                    [
                        OsString::from("1"),
                        OsString::from("16384"),
                        executable.into(),
                        OsString::from("0x80"),
                    ],
                    self.timeout,
                )?;
                fs::write(&hex_image, converted.stdout)
                    .map_err(|source| Error::io(&hex_image, source))?;

                let args: Vec<OsString> = vec![
                    "-i".into(),
                    hex_image.into(),
                    "-s".into(),
                    bounds.begin.to_string().into(),
                    "-e".into(),
                    bounds.end.to_string().into(),
                ];
                tool.run(args, self.timeout)?;
                Signature::from_file(&work_dir.join(SIGNATURE_FILE))
            }
            ModelInterface::RiscvOvpsim => {
                let configuration = platform.configuration_string().to_uppercase();
                let variant = &configuration[..configuration.len().min(5)];
                let sig_file = work_dir.join(SIGNATURE_FILE);
                let args: Vec<OsString> = vec![
                    "--variant".into(),
                    variant.into(),
                    "--program".into(),
                    executable.into(),
                    "--signaturedump".into(),
                    "--customcontrol".into(),
                    "--override".into(),
                    format!("riscvOVPsim/cpu/sigdump/SignatureFile={}", sig_file.display()).into(),
                    "--override".into(),
                    "riscvOVPsim/cpu/sigdump/ResultReg=3".into(),
                    "--override".into(),
                    "riscvOVPsim/cpu/simulateexceptions=T".into(),
                    "--override".into(),
                    "riscvOVPsim/cpu/defaultsemihost=F".into(),
                    "--logfile".into(),
                    work_dir.join("runtime_log.txt").into(),
                    "--override".into(),
                    "riscvOVPsim/cpu/user_version=2.3".into(),
                    "--override".into(),
                    "riscvOVPsim/cpu/priv_version=1.11".into(),
                    "--override".into(),
                    format!("riscvOVPsim/cpu/misa_Extensions={}", platform.misa_hex()).into(),
                ];
                tool.run(args, self.timeout)?;
                Signature::from_file(&sig_file)
            }
            ModelInterface::Reference => {
                let sig_file = signature_path(executable);
                let args: Vec<OsString> = vec![
                    format!("--isa={}", platform.configuration_string()).into(),
                    format!("+signature={}", sig_file.display()).into(),
                    executable.into(),
                ];
                tool.run(args, self.timeout)?;
                Signature::from_file(&sig_file)
            }
        }
    }
}
