//! Test signatures.
//!
//! A signature is the sequence of 32-bit result words a test writes into
//! its signature region. The golden model and the tested implementation
//! each dump the region to a text file, one fixed-width lower-case hex
//! word per line; compliance is equality of the two dumps.
//!
//! ## Submodules
//!
//! - [`elf`]: signature-region symbol addresses from compiled binaries.

pub mod elf;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::common::error::{Error, Result};

/// Zero words emitted after the end boundary of every signature region.
pub const PAD_WORDS: usize = 4;

/// A parsed signature dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    words: Vec<u32>,
}

impl Signature {
    /// Wraps a word sequence.
    pub fn new(words: Vec<u32>) -> Self {
        Self { words }
    }

    /// Reads and parses a signature file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        Self::parse(path, &text)
    }

    /// Parses signature text, one hex word per line.
    ///
    /// Blank lines are tolerated anywhere; anything else that does not
    /// parse as a 32-bit hex word is an error naming the offending line.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let mut words = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let word = u32::from_str_radix(line, 16).map_err(|_| Error::SignatureParse {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("'{line}' is not a 32-bit hexadecimal word"),
            })?;
            words.push(word);
        }
        Ok(Self { words })
    }

    /// The result words, in memory order.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of result words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the signature holds no words at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The in-memory image of the region: the result words followed by
    /// the [`PAD_WORDS`] zero pad external checkers expect.
    pub fn padded_image(&self) -> Vec<u32> {
        let mut image = self.words.clone();
        image.extend(std::iter::repeat_n(0, PAD_WORDS));
        image
    }

    /// Compares this signature (the reference) against another.
    pub fn compare(&self, actual: &Self) -> Comparison {
        if self.words.len() != actual.words.len() {
            return Comparison::LengthMismatch {
                expected: self.words.len(),
                actual: actual.words.len(),
            };
        }
        for (index, (expected, got)) in self.words.iter().zip(&actual.words).enumerate() {
            if expected != got {
                return Comparison::WordMismatch {
                    index,
                    expected: *expected,
                    actual: *got,
                };
            }
        }
        Comparison::Match
    }
}

impl fmt::Display for Signature {
    /// Renders the dump format back out: one 8-digit hex word per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.words {
            writeln!(f, "{word:08x}")?;
        }
        Ok(())
    }
}

/// Outcome of a signature comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Same length, same words.
    Match,
    /// The dumps differ in word count.
    LengthMismatch {
        /// Reference word count.
        expected: usize,
        /// Actual word count.
        actual: usize,
    },
    /// First differing word.
    WordMismatch {
        /// Zero-based word index of the first difference.
        index: usize,
        /// Reference word at that index.
        expected: u32,
        /// Actual word at that index.
        actual: u32,
    },
}

impl Comparison {
    /// Whether the signatures were equal.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "signatures match"),
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "signature length mismatch: expected {expected} words, got {actual}"
            ),
            Self::WordMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "signature mismatch at word {index}: expected {expected:08x}, got {actual:08x}"
            ),
        }
    }
}
