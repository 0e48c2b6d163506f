//! Diagnostics reported while lowering a unit.
//!
//! Codes are stable:
//!
//! - `PS` codes come from the parser (see [`crate::error::SyntaxErrorKind`]).
//! - `BL0` codes are classifier warnings.
//! - `BL1` codes reject input before rewriting; `BL1000` is undecodable bytes.
//!
//! ```
//! use bigint_lower_js::diagnostics::{Diagnostic, FileId, Span, TextRange};
//!
//! let diag = Diagnostic::warning(
//!   "BL0001",
//!   "cannot classify expression",
//!   Span::new(FileId(0), TextRange::new(4, 5)),
//! );
//! let rendered = diag.render("example.js", "let x = 1;");
//! assert!(rendered.contains("warning[BL0001]"));
//! assert!(rendered.contains("--> example.js:1:5"));
//! ```

use memchr::memchr_iter;
use std::fmt;
use std::fmt::Write;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// Half-open byte range.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> TextRange {
    TextRange { start, end }
  }

  pub fn len(&self) -> u32 {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Ordered by file, then position, which is the order diagnostics are reported in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Span {
  pub file: FileId,
  pub range: TextRange,
}

impl Span {
  pub const fn new(file: FileId, range: TextRange) -> Span {
    Span { file, range }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Severity {
  Error,
  Warning,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
    })
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub primary: Span,
  pub notes: Vec<String>,
}

impl Diagnostic {
  fn with_severity(severity: Severity, code: &'static str, message: String, primary: Span) -> Diagnostic {
    Diagnostic {
      code,
      severity,
      message,
      primary,
      notes: Vec::new(),
    }
  }

  pub fn error(code: &'static str, message: impl Into<String>, primary: Span) -> Diagnostic {
    Diagnostic::with_severity(Severity::Error, code, message.into(), primary)
  }

  pub fn warning(code: &'static str, message: impl Into<String>, primary: Span) -> Diagnostic {
    Diagnostic::with_severity(Severity::Warning, code, message.into(), primary)
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Diagnostic {
    self.notes.push(note.into());
    self
  }

  /// A short report headed by the code, with a 1-based `line:column` for the primary span.
  pub fn render(&self, file_name: &str, source: &str) -> String {
    let (line, column) = LineIndex::new(source).position(self.primary.range.start as usize);
    let mut out = format!(
      "{}[{}]: {}\n --> {}:{}:{}\n",
      self.severity, self.code, self.message, file_name, line, column
    );
    for note in &self.notes {
      // Writing to a String cannot fail.
      let _ = writeln!(out, "  = note: {}", note);
    }
    out
  }
}

/// Maps byte offsets to lines and columns. Columns count characters, not bytes.
pub struct LineIndex<'a> {
  source: &'a str,
  line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
  pub fn new(source: &'a str) -> LineIndex<'a> {
    let line_starts = std::iter::once(0)
      .chain(memchr_iter(b'\n', source.as_bytes()).map(|i| i + 1))
      .collect();
    LineIndex {
      source,
      line_starts,
    }
  }

  /// 1-based line and column. Offsets past the end clamp to it, and offsets inside a character
  /// round down to its start.
  pub fn position(&self, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(self.source.len());
    while !self.source.is_char_boundary(offset) {
      offset -= 1;
    }
    let line = self.line_starts.partition_point(|&start| start <= offset);
    let start = self.line_starts[line - 1];
    (line, self.source[start..offset].chars().count() + 1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_position_on_later_line() {
    let source = "let a = 1;\nlet b = 2n;\n";
    let diag = Diagnostic::error(
      "BL1003",
      "update expressions are not supported",
      Span::new(FileId(0), TextRange::new(15, 16)),
    )
    .with_note("rewrite as an assignment");
    assert_eq!(
      diag.render("input.js", source),
      "error[BL1003]: update expressions are not supported\n --> input.js:2:5\n  = note: rewrite as an assignment\n"
    );
  }

  #[test]
  fn line_index_positions() {
    let index = LineIndex::new("ab\né\nx");
    assert_eq!(index.position(0), (1, 1));
    assert_eq!(index.position(2), (1, 3));
    assert_eq!(index.position(3), (2, 1));
    assert_eq!(index.position(4), (2, 1));
    assert_eq!(index.position(5), (2, 2));
    assert_eq!(index.position(7), (3, 1));
    assert_eq!(index.position(100), (3, 2));
  }
}
