//! Signature-region addresses from compiled test binaries.
//!
//! Models that read program memory directly (the RI5CY/Verilator flow)
//! are told where the signature region lives on their command line. The
//! bounds come from the linked symbols of the compiled test.

use std::fs;
use std::path::Path;

use object::{Object, ObjectSymbol};

use crate::common::error::{Error, Result};

/// Symbol names accepted for the start of the signature region.
const BEGIN_SYMBOLS: [&str; 2] = ["begin_signature", "codasip_signature_start"];

/// Symbol names accepted for the end of the signature region.
const END_SYMBOLS: [&str; 2] = ["end_signature", "codasip_signature_end"];

/// Start and end addresses of a test binary's signature region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureBounds {
    /// Address of the first result word.
    pub begin: u64,
    /// Address one past the last result word, before the zero pad.
    pub end: u64,
}

impl SignatureBounds {
    /// Region length in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.begin)
    }

    /// Whether the region is empty.
    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }
}

/// Reads the signature-region bounds from an ELF executable.
pub fn signature_bounds(path: &Path) -> Result<SignatureBounds> {
    let data = fs::read(path).map_err(|source| Error::io(path, source))?;
    let file = object::File::parse(&*data).map_err(|err| Error::Elf {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let begin = find_symbol(&file, &BEGIN_SYMBOLS, path)?;
    let end = find_symbol(&file, &END_SYMBOLS, path)?;
    Ok(SignatureBounds { begin, end })
}

fn find_symbol(file: &object::File<'_>, names: &[&str], path: &Path) -> Result<u64> {
    file.symbols()
        .find_map(|sym| {
            let name = sym.name().ok()?;
            names.contains(&name).then(|| sym.address())
        })
        .ok_or_else(|| Error::SymbolNotFound {
            symbol: names[0].to_string(),
            path: path.to_path_buf(),
        })
}
