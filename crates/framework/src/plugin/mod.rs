//! Plugins.
//!
//! A plugin is a self-contained directory describing one tested model:
//!
//! ```text
//! plugin/
//! ├── plugin.json          manifest: target, model name, platform
//! └── environment/
//!     ├── include/*.h      compilation headers
//!     └── *.ld             optional linker scripts
//! ```
//!
//! ## Submodules
//!
//! - [`generator`]: stages platform properties and writes plugin
//!   directories for built-in targets.
//! - [`manifest`]: the `plugin.json` payload.

pub mod generator;
pub mod manifest;

pub use generator::PluginGenerator;
pub use manifest::PluginManifest;

use std::path::{Path, PathBuf};

use crate::common::constants::ENVIRONMENT_DIR;
use crate::common::error::Result;
use crate::environment::Environment;
use crate::platform::Platform;

/// An opened plugin directory.
#[derive(Debug, Clone)]
pub struct Plugin {
    root: PathBuf,
    manifest: PluginManifest,
}

impl Plugin {
    /// Opens a plugin directory and loads its manifest.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let manifest = PluginManifest::load(&root)?;
        Ok(Self { root, manifest })
    }

    /// The plugin root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded manifest.
    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// The declared platform configuration.
    pub fn platform(&self) -> &Platform {
        &self.manifest.platform
    }

    /// Opens the plugin's compilation environment.
    pub fn environment(&self) -> Result<Environment> {
        Environment::open(self.root.join(ENVIRONMENT_DIR))
    }
}
