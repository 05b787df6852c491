//! The loaded input document with line-start indexing.

use crate::span::Span;
use bddlay_common::ContentHash;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The input document, with precomputed line starts for location lookup.
pub struct SourceText {
    /// Path the document was read from, or a synthetic name.
    pub path: PathBuf,
    /// Full document text.
    pub content: String,
    /// XXH3 digest of `content`.
    pub content_hash: ContentHash,
    line_starts: Vec<u32>,
}

/// One line of the document, without its terminator.
#[derive(Debug, Clone, Copy)]
pub struct SourceLine<'a> {
    /// 1-indexed line number.
    pub number: u32,
    /// Byte span of the line text (terminator excluded).
    pub span: Span,
    /// The line text.
    pub text: &'a str,
}

/// A 1-indexed line/column position in a named document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Document path.
    pub path: PathBuf,
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column (in bytes).
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

impl SourceText {
    /// Wraps an in-memory document. `name` is used as its path.
    pub fn new(name: impl Into<PathBuf>, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        Self {
            path: name.into(),
            content,
            content_hash,
            line_starts,
        }
    }

    /// Reads a document from disk.
    pub fn load(path: &Path) -> Result<Self, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_path_buf(), content))
    }

    /// Number of lines, counting a final line without terminator.
    pub fn line_count(&self) -> usize {
        if self.content.ends_with('\n') {
            self.line_starts.len() - 1
        } else {
            self.line_starts.len()
        }
    }

    /// Iterates over all lines in order, stripping `\n` and `\r\n`.
    pub fn lines(&self) -> impl Iterator<Item = SourceLine<'_>> + '_ {
        (0..self.line_count()).map(move |idx| {
            let start = self.line_starts[idx] as usize;
            let mut end = self
                .line_starts
                .get(idx + 1)
                .map_or(self.content.len(), |&next| next as usize - 1);
            if end > start && self.content.as_bytes()[end - 1] == b'\r' {
                end -= 1;
            }
            SourceLine {
                number: idx as u32 + 1,
                span: Span::new(start as u32, end as u32),
                text: &self.content[start..end],
            }
        })
    }

    /// Converts a byte offset into 1-indexed `(line, column)`.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line_idx as u32 + 1, col)
    }

    /// Resolves the start of a span to a printable location.
    ///
    /// Returns `None` for [`Span::DUMMY`] or spans past the end of the text.
    pub fn locate(&self, span: Span) -> Option<Location> {
        if span.is_dummy() || span.start as usize > self.content.len() {
            return None;
        }
        let (line, column) = self.line_col(span.start);
        Some(Location {
            path: self.path.clone(),
            line,
            column,
        })
    }

    /// Returns the full line containing the start of `span`.
    pub fn line_of(&self, span: Span) -> Option<SourceLine<'_>> {
        let loc = self.locate(span)?;
        self.lines().nth(loc.line as usize - 1)
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
