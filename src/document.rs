//! In-memory note buffer
//!
//! Figures are rewritten in place. A replacement must have exactly as many
//! lines as the block it replaces, so indices collected before any
//! replacement stay valid.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Lines of one markdown note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl SourceDocument {
    /// Split text into lines, remembering a trailing newline
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            trailing_newline: content.ends_with('\n'),
        }
    }

    /// Read a note from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Write the note to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    /// All lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines `start..=end`
    pub fn block(&self, start: usize, end: usize) -> Result<&[String]> {
        if end >= self.lines.len() || start > end {
            return Err(Error::LineOutOfRange {
                line: end.max(start),
                len: self.lines.len(),
            });
        }
        Ok(&self.lines[start..=end])
    }

    /// Replace lines `start..=end` with exactly as many new lines
    pub fn replace_block(
        &mut self,
        start: usize,
        end: usize,
        replacement: Vec<String>,
    ) -> Result<()> {
        self.block(start, end)?;

        let expected = end - start + 1;
        if replacement.len() != expected {
            return Err(Error::BlockLength {
                start,
                expected,
                actual: replacement.len(),
            });
        }

        for (offset, line) in replacement.into_iter().enumerate() {
            self.lines[start + offset] = line;
        }

        Ok(())
    }
}

impl fmt::Display for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))?;
        if self.trailing_newline {
            writeln!(f)?;
        }
        Ok(())
    }
}
