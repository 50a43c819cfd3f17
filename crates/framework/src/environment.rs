//! Compilation environments.
//!
//! An environment is a directory of inputs for compiling test assemblies
//! for one execution side: headers under `include/` and optional linker
//! scripts at the root. Reference environments sometimes keep headers at
//! the root instead; lookups fall back accordingly.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::constants::{HEADER_SUFFIX, INCLUDE_DIR, LDSCRIPT_SUFFIX, MANDATORY_HEADERS};
use crate::common::error::{Error, Result};

/// A directory of compilation inputs for one execution side.
#[derive(Debug, Clone)]
pub struct Environment {
    root: PathBuf,
}

impl Environment {
    /// Opens an environment rooted at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Environment`] when the path is not a directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let root = path.into();
        if !root.is_dir() {
            return Err(Error::Environment { path: root });
        }
        Ok(Self { root })
    }

    /// The environment root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory handed to the compiler as an include path.
    ///
    /// `include/` when the environment has one, otherwise the root.
    pub fn include_dir(&self) -> PathBuf {
        let include = self.root.join(INCLUDE_DIR);
        if include.is_dir() { include } else { self.root.clone() }
    }

    /// Header files in the include directory, sorted by file name.
    pub fn headers(&self) -> Result<Vec<PathBuf>> {
        files_with_suffix(&self.include_dir(), HEADER_SUFFIX)
    }

    /// The first linker script at the environment root, if any.
    pub fn linker_script(&self) -> Result<Option<PathBuf>> {
        let mut scripts = files_with_suffix(&self.root, LDSCRIPT_SUFFIX)?;
        if scripts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(scripts.remove(0)))
        }
    }

    /// Locates a header by file name, `include/` first, then the root.
    pub fn find_header(&self, file_name: &str) -> Option<PathBuf> {
        let candidates = [
            self.root.join(INCLUDE_DIR).join(file_name),
            self.root.join(file_name),
        ];
        candidates.into_iter().find(|path| path.is_file())
    }

    /// Mandatory headers the environment does not provide.
    ///
    /// An environment is usable for compilation only when this is empty.
    pub fn missing_headers(&self) -> Vec<&'static str> {
        MANDATORY_HEADERS
            .iter()
            .copied()
            .filter(|header| self.find_header(header).is_none())
            .collect()
    }
}

/// Files directly under `dir` whose names end with `suffix`, sorted.
fn files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::io(dir, source))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::io(dir, source))?;
        let path = entry.path();
        let is_match = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if is_match && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
