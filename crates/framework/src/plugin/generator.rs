//! Plugin generation.
//!
//! The generator stages a platform configuration for a built-in target,
//! validating every property as it is staged, then writes a complete
//! plugin directory in one pass. A failed generation never leaves a
//! partial plugin behind: the platform is re-validated before the first
//! file is written.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::common::arch::{BaseIsa, Csr, Extension, MemoryRange, PrivilegeMode, TrapCause};
use crate::common::constants::{ENVIRONMENT_DIR, INCLUDE_DIR, MANDATORY_HEADERS};
use crate::common::error::{Error, Result};
use crate::environment::Environment;
use crate::platform::Platform;
use crate::plugin::manifest::PluginManifest;
use crate::target::Target;

/// Model display name used when none is configured.
pub const DEFAULT_MODEL_NAME: &str = "RISC-V model";

/// Stages platform properties and writes plugin directories.
#[derive(Debug, Clone)]
pub struct PluginGenerator {
    target: &'static Target,
    platform: Platform,
    model_name: Option<String>,
}

impl PluginGenerator {
    /// Creates a generator for a target with the two required
    /// properties, the base ISA and the memory range.
    pub fn new(target: &'static Target, isa: BaseIsa, memory: MemoryRange) -> Result<Self> {
        memory.validate()?;
        Ok(Self {
            target,
            platform: Platform::new(isa, memory),
            model_name: None,
        })
    }

    /// The target the plugin is generated for.
    pub fn target(&self) -> &'static Target {
        self.target
    }

    /// The staged platform configuration.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Stages a standard extension. Duplicates are ignored.
    pub fn extension(&mut self, extension: Extension) -> &mut Self {
        self.platform.add_extension(extension);
        self
    }

    /// Unstages a standard extension. Absent values are ignored.
    pub fn remove_extension(&mut self, extension: Extension) -> &mut Self {
        self.platform.remove_extension(extension);
        self
    }

    /// Stages a privilege mode.
    pub fn mode(&mut self, mode: PrivilegeMode) -> &mut Self {
        self.platform.add_mode(mode);
        self
    }

    /// Stages a supported exception cause.
    pub fn cause(&mut self, cause: TrapCause) -> &mut Self {
        self.platform.add_cause(cause);
        self
    }

    /// Stages an implemented control and status register.
    pub fn csr(&mut self, csr: Csr) -> &mut Self {
        self.platform.add_csr(csr);
        self
    }

    /// Replaces the staged memory range.
    pub fn memory(&mut self, memory: MemoryRange) -> Result<&mut Self> {
        self.platform.set_memory(memory)?;
        Ok(self)
    }

    /// Declares misaligned-access support.
    pub fn misaligned(&mut self, supported: bool) -> &mut Self {
        self.platform.set_misaligned(supported);
        self
    }

    /// Declares interrupt support.
    pub fn interrupts(&mut self, supported: bool) -> &mut Self {
        self.platform.set_interrupt_support(supported);
        self
    }

    /// Sets the model display name.
    ///
    /// Targets that fix their model name (riscvOVPsim) override this.
    pub fn model_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.model_name = Some(name.into());
        self
    }

    /// Writes the plugin directory.
    ///
    /// Mandatory headers come from the target's own header set where it
    /// supplies one, otherwise from the reference environment; headers
    /// found nowhere are logged as warnings. Generating into an existing
    /// directory overwrites its content; an existing *file* is an error.
    pub fn generate(&self, output: &Path, reference: Option<&Environment>) -> Result<()> {
        info!("generating plugin for target {}", self.target.name());

        let mut platform = self.platform.clone();
        platform.normalize();
        platform.validate()?;
        // The manifest always declares both behavior switches.
        if platform.misaligned.is_none() {
            platform.set_misaligned(false);
        }
        if platform.interrupt_support.is_none() {
            platform.set_interrupt_support(false);
        }

        let name = self
            .target
            .model_name()
            .map(str::to_string)
            .or_else(|| self.model_name.clone())
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
        let manifest = PluginManifest {
            target: self.target.name().to_string(),
            name,
            interface: self.target.interface(),
            compiler: self.target.compiler(),
            platform,
        };

        if output.is_file() {
            return Err(Error::generate(format!(
                "output path {} is an existing file",
                output.display()
            )));
        }
        if output.is_dir() {
            info!(
                "output directory {} already exists, content will be rewritten",
                output.display()
            );
        } else {
            info!("creating output directory {}", output.display());
        }
        let include_dir = output.join(ENVIRONMENT_DIR).join(INCLUDE_DIR);
        fs::create_dir_all(&include_dir).map_err(|source| Error::io(&include_dir, source))?;

        for header in MANDATORY_HEADERS {
            let dest = include_dir.join(header);
            if let Some(text) = self.target.header(header) {
                info!("writing header file {header}");
                fs::write(&dest, text).map_err(|source| Error::io(&dest, source))?;
            } else if let Some(src) = reference.and_then(|env| env.find_header(header)) {
                info!("copying header file {}", src.display());
                fs::copy(&src, &dest).map_err(|source| Error::io(&src, source))?;
            } else {
                warn!("unable to find mandatory header file {header}");
            }
        }

        manifest.save(output)?;
        info!("plugin written to {}", output.display());
        Ok(())
    }
}
