//! The plugin manifest.
//!
//! `plugin.json` at the plugin root declares everything the runner needs
//! to drive a tested model: which target generated the plugin, the model
//! display name, the invocation conventions, and the platform
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::constants::PLUGIN_MANIFEST;
use crate::common::error::{Error, Result};
use crate::platform::Platform;
use crate::target::{CompilerProfile, ModelInterface};

/// Contents of `plugin.json`.
///
/// ```
/// use rvtest_core::plugin::PluginManifest;
///
/// let manifest: PluginManifest = serde_json::from_str(
///     r#"{
///         "target": "default",
///         "name": "RISC-V model",
///         "platform": {
///             "isa": "rv32i",
///             "memory": { "size": 4194304, "program_start": 0, "data_start": 0 }
///         }
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(manifest.platform.configuration_string(), "rv32i");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Registry name of the target the plugin was generated for.
    pub target: String,
    /// Model display name used in reports.
    pub name: String,
    /// How the model executable is driven.
    #[serde(default)]
    pub interface: ModelInterface,
    /// How test sources are compiled for the model.
    #[serde(default)]
    pub compiler: CompilerProfile,
    /// Configuration of the processor under test.
    pub platform: Platform,
}

impl PluginManifest {
    /// Path of the manifest file inside a plugin directory.
    pub fn path_in(plugin_dir: &Path) -> PathBuf {
        plugin_dir.join(PLUGIN_MANIFEST)
    }

    /// Loads and validates the manifest from a plugin directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] when the file is missing or malformed
    /// and [`Error::Platform`] when the declared platform is invalid.
    pub fn load(plugin_dir: &Path) -> Result<Self> {
        let path = Self::path_in(plugin_dir);
        let text = fs::read_to_string(&path).map_err(|source| Error::Manifest {
            path: path.clone(),
            reason: source.to_string(),
        })?;
        let mut manifest: Self =
            serde_json::from_str(&text).map_err(|source| Error::Manifest {
                path,
                reason: source.to_string(),
            })?;
        manifest.platform.normalize();
        manifest.platform.validate()?;
        Ok(manifest)
    }

    /// Writes the manifest into a plugin directory as pretty JSON.
    pub fn save(&self, plugin_dir: &Path) -> Result<()> {
        let path = Self::path_in(plugin_dir);
        let text = serde_json::to_string_pretty(self)?;
        fs::write(&path, text + "\n").map_err(|source| Error::io(path, source))
    }
}
