use crate::diagnostics::FileId;
use crate::diagnostics::Span;
use crate::diagnostics::TextRange;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorKind;
use crate::token::TokenKind;
use serde::Serialize;
use std::cmp::max;
use std::cmp::min;
use std::ops::Add;
use std::ops::AddAssign;

/// A half-open range of UTF-8 byte offsets into the source. Synthesized nodes
/// carry the range of the node they were derived from.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn at(offset: usize) -> Loc {
    Loc(offset, offset)
  }

  pub fn error(self, kind: SyntaxErrorKind, found: Option<TokenKind>) -> SyntaxError {
    SyntaxError::new(kind, self, found)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn contains(&self, other: Loc) -> bool {
    self.0 <= other.0 && other.1 <= self.1
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  /// Offsets past `u32::MAX` are clamped.
  pub fn to_range(self) -> TextRange {
    let clamp = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
    TextRange::new(clamp(self.0), clamp(self.1))
  }

  pub fn to_span(self, file: FileId) -> Span {
    Span::new(file, self.to_range())
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}
