//! Configuration header parsing.
//!
//! Target headers are C preprocessor files spliced textually into the
//! generic test skeletons. The parser extracts the surface the
//! validator reasons about: the include guard, quoted includes, every
//! `#define` with its parameters and continued body, and the
//! word-width switch (`__riscv_xlen` under the target's 64-bit flag).
//!
//! Nothing is re-rendered from the parsed form; the built-in header
//! texts in [`super::templates`] stay verbatim.

use crate::common::error::{Error, Result};

/// Name of the word-width constant generic test macros branch on.
pub const WORD_WIDTH_MACRO: &str = "__riscv_xlen";

/// A parsed `#define`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDef {
    /// Macro name.
    pub name: String,
    /// Parameter names, `None` for an object-like macro.
    pub params: Option<Vec<String>>,
    /// Body lines, trimmed, with continuation backslashes stripped.
    pub body: Vec<String>,
    /// One-based line the definition starts on.
    pub line: usize,
}

impl MacroDef {
    /// Parameter count, `None` for an object-like macro.
    pub fn arity(&self) -> Option<usize> {
        self.params.as_ref().map(Vec::len)
    }

    /// Whether the macro expands to nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(|line| line.is_empty())
    }

    /// Number of `.word 0` directives in the body.
    pub fn zero_words(&self) -> usize {
        self.body
            .iter()
            .filter(|line| {
                let directive = line.trim_end_matches(';').trim();
                directive == ".word 0"
            })
            .count()
    }

    /// Arguments of `.align` directives in the body.
    pub fn alignments(&self) -> Vec<u32> {
        self.body
            .iter()
            .filter_map(|line| {
                let rest = line.strip_prefix(".align")?;
                rest.trim_end_matches(';').trim().parse().ok()
            })
            .collect()
    }

    /// Labels the body defines, without the trailing colon.
    pub fn labels(&self) -> Vec<String> {
        self.body
            .iter()
            .filter_map(|line| {
                let label = line.trim_end_matches(';').trim().strip_suffix(':')?;
                let valid = !label.is_empty()
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                valid.then(|| label.to_string())
            })
            .collect()
    }

    /// Symbol the body's first store instruction writes to, if any.
    ///
    /// Recognizes the symbol-addressed form `s{b,h,w,d} rs, symbol, rt`;
    /// offset-addressed stores carry no symbol and are ignored.
    pub fn store_symbol(&self) -> Option<String> {
        self.body.iter().find_map(|line| {
            let (mnemonic, operands) = line.split_once(char::is_whitespace)?;
            if !matches!(mnemonic, "sb" | "sh" | "sw" | "sd") {
                return None;
            }
            let target = operands.split(',').nth(1)?.trim_end_matches(';').trim();
            let symbolic = !target.is_empty()
                && target
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !target.chars().next().is_some_and(|c| c.is_ascii_digit());
            symbolic.then(|| target.to_string())
        })
    }
}

/// The `__riscv_xlen` selection block.
///
/// ```text
/// #ifdef CODASIP_RV64
/// #define __riscv_xlen    64
/// #else
/// #define __riscv_xlen    32
/// #endif
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordWidth {
    /// Value when the target's 64-bit flag is defined.
    pub flagged: u32,
    /// Value otherwise.
    pub default: u32,
}

/// A parsed configuration header.
#[derive(Debug, Clone)]
pub struct HeaderFile {
    /// File name the text was parsed as, used in error positions.
    pub name: String,
    /// Include-guard macro, when the file opens with one.
    pub guard: Option<String>,
    /// Quoted `#include` file names.
    pub includes: Vec<String>,
    /// Macro definitions in file order, the guard define excluded.
    pub macros: Vec<MacroDef>,
    /// The word-width switch, when present.
    pub word_width: Option<WordWidth>,
}

impl HeaderFile {
    /// Parses a header text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HeaderParse`] with the offending line for a
    /// nameless `#define`, an unterminated conditional, or a
    /// non-numeric word-width value.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        Parser::new(name, text).run()
    }

    /// Looks a macro up by name.
    pub fn find(&self, name: &str) -> Option<&MacroDef> {
        self.macros.iter().find(|def| def.name == name)
    }
}

/// Line cursor over a header text.
struct Parser<'a> {
    name: &'a str,
    lines: Vec<&'a str>,
    pos: usize,
}

/// Which arm of a conditional block a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arm {
    Flagged,
    Default,
}

impl<'a> Parser<'a> {
    fn new(name: &'a str, text: &'a str) -> Self {
        Self {
            name,
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn error(&self, line: usize, reason: impl Into<String>) -> Error {
        Error::HeaderParse {
            header: self.name.to_string(),
            line,
            reason: reason.into(),
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line))
    }

    fn run(mut self) -> Result<HeaderFile> {
        let mut header = HeaderFile {
            name: self.name.to_string(),
            guard: None,
            includes: Vec::new(),
            macros: Vec::new(),
            word_width: None,
        };
        // Depth of open conditionals beyond the include guard; the
        // word-width `#ifdef`/`#else` arms are tracked separately.
        let mut guard_open = false;
        let mut arm: Option<Arm> = None;
        let mut flagged: Option<(usize, u32)> = None;
        let mut default: Option<(usize, u32)> = None;

        while let Some((number, raw)) = self.next() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if let Some(rest) = line.strip_prefix("#ifndef") {
                let symbol = rest.trim();
                // An `#ifndef X` / `#define X` pair opening the file is
                // the include guard.
                if header.guard.is_none() && !guard_open {
                    header.guard = Some(symbol.to_string());
                    guard_open = true;
                    if let Some((_, next)) = self.next() {
                        let expected = format!("#define {symbol}");
                        if next.trim() != expected {
                            self.pos -= 1;
                        }
                    }
                }
            } else if let Some(rest) = line.strip_prefix("#include") {
                let file = rest.trim().trim_matches(|c| c == '"' || c == '<' || c == '>');
                header.includes.push(file.to_string());
            } else if line.strip_prefix("#ifdef").is_some() {
                if arm.is_some() {
                    return Err(self.error(number, "nested #ifdef"));
                }
                arm = Some(Arm::Flagged);
            } else if line == "#else" {
                if arm != Some(Arm::Flagged) {
                    return Err(self.error(number, "#else outside a conditional"));
                }
                arm = Some(Arm::Default);
            } else if line == "#endif" || line.starts_with("#endif ") || line.starts_with("#endif\t")
            {
                if arm.take().is_none() {
                    if !guard_open {
                        return Err(self.error(number, "#endif outside a conditional"));
                    }
                    guard_open = false;
                }
            } else if line.strip_prefix("#define").is_some() {
                let def = self.parse_define(number, line)?;
                if def.name == WORD_WIDTH_MACRO {
                    let value = self.parse_width(&def)?;
                    match arm {
                        Some(Arm::Flagged) => flagged = Some(value),
                        Some(Arm::Default) | None => default = Some(value),
                    }
                } else {
                    header.macros.push(def);
                }
            }
        }
        if arm.is_some() {
            return Err(self.error(self.lines.len(), "unterminated conditional"));
        }

        header.word_width = match (flagged, default) {
            (Some((_, flagged)), Some((_, default))) => Some(WordWidth { flagged, default }),
            // A single unconditional definition covers both arms.
            (None, Some((_, value))) => Some(WordWidth {
                flagged: value,
                default: value,
            }),
            (Some((line, _)), None) => {
                return Err(self.error(line, "word width defined only under the 64-bit flag"));
            }
            (None, None) => None,
        };
        Ok(header)
    }

    /// Parses one `#define`, consuming continuation lines.
    fn parse_define(&mut self, number: usize, line: &str) -> Result<MacroDef> {
        let rest = line["#define".len()..].trim_start();
        if rest.is_empty() {
            return Err(self.error(number, "#define without a name"));
        }

        // The name runs to the first whitespace, backslash, or an
        // immediately adjacent parameter list.
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == '\\')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        let mut tail = &rest[name_end..];

        let params = if let Some(list) = tail.strip_prefix('(') {
            let close = list
                .find(')')
                .ok_or_else(|| self.error(number, "unterminated parameter list"))?;
            let names = list[..close]
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            tail = &list[close + 1..];
            Some(names)
        } else {
            None
        };

        let mut body = Vec::new();
        let (first, mut continued) = strip_continuation(tail);
        if !first.is_empty() {
            body.push(first.to_string());
        }
        while continued {
            let Some((_, raw)) = self.next() else { break };
            let (text, more) = strip_continuation(raw);
            body.push(text.to_string());
            continued = more;
        }

        Ok(MacroDef {
            name: name.to_string(),
            params,
            body,
            line: number,
        })
    }

    /// Extracts the numeric value of a `__riscv_xlen` definition.
    fn parse_width(&self, def: &MacroDef) -> Result<(usize, u32)> {
        let text = def.body.join(" ");
        let value = text
            .trim()
            .parse()
            .map_err(|_| self.error(def.line, format!("word width '{}' is not a number", text.trim())))?;
        Ok((def.line, value))
    }
}

/// Trims a body line and reports whether it continues on the next one.
fn strip_continuation(line: &str) -> (&str, bool) {
    let trimmed = line.trim();
    trimmed.strip_suffix('\\').map_or((trimmed, false), |kept| (kept.trim(), true))
}
