//! Syntax errors.

use crate::diagnostics::Diagnostic;
use crate::diagnostics::FileId;
use crate::loc::Loc;
use crate::token::TokenKind;
use std::error::Error;
use std::fmt;

/// Why a unit failed to parse. Each kind maps to a stable `PS` diagnostic code.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorKind {
  /// The lexer could not form a token, e.g. an unterminated comment or string.
  InvalidToken,
  Expected(&'static str),
  InvalidAssignmentTarget,
  NewlineBeforeArrow,
  NewlineAfterThrow,
  /// A bad numeric literal: misplaced `_`, leading zeros on a BigInt, or digits outside the radix.
  MalformedNumber,
  MissingToken(TokenKind),
  TryWithoutHandler,
  UnexpectedEnd,
  Unsupported(&'static str),
  /// `-a ** b` and similar.
  UnaryBeforeExponentiation,
}

impl SyntaxErrorKind {
  pub fn code(self) -> &'static str {
    use SyntaxErrorKind::*;
    match self {
      InvalidToken => "PS0001",
      Expected(_) => "PS0002",
      InvalidAssignmentTarget => "PS0003",
      NewlineBeforeArrow => "PS0004",
      NewlineAfterThrow => "PS0005",
      MalformedNumber => "PS0006",
      MissingToken(_) => "PS0007",
      TryWithoutHandler => "PS0008",
      UnexpectedEnd => "PS0009",
      Unsupported(_) => "PS0010",
      UnaryBeforeExponentiation => "PS0011",
    }
  }

  pub fn message(self) -> String {
    use SyntaxErrorKind::*;
    match self {
      InvalidToken => "invalid or unterminated token".to_string(),
      Expected(what) => format!("expected {}", what),
      InvalidAssignmentTarget => "invalid assignment target".to_string(),
      NewlineBeforeArrow => "line break before `=>`".to_string(),
      NewlineAfterThrow => "line break after `throw`".to_string(),
      MalformedNumber => "malformed numeric literal".to_string(),
      MissingToken(kind) => match kind.spelling() {
        Some(text) => format!("expected `{}`", text),
        None => format!("expected {:?}", kind),
      },
      TryWithoutHandler => "`try` without `catch` or `finally`".to_string(),
      UnexpectedEnd => "unexpected end of input".to_string(),
      Unsupported(what) => format!("{} is not supported", what),
      UnaryBeforeExponentiation => "unary operand of `**` must be parenthesized".to_string(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
  pub kind: SyntaxErrorKind,
  pub loc: Loc,
  /// The token found where the error was detected.
  pub found: Option<TokenKind>,
}

impl SyntaxError {
  pub fn new(kind: SyntaxErrorKind, loc: Loc, found: Option<TokenKind>) -> SyntaxError {
    SyntaxError { kind, loc, found }
  }

  pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
    let diagnostic = Diagnostic::error(self.kind.code(), self.kind.message(), self.loc.to_span(file));
    match self.found {
      Some(TokenKind::End) | None => diagnostic,
      Some(found) => diagnostic.with_note(format!("found {:?}", found)),
    }
  }
}

impl fmt::Display for SyntaxError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} at {}..{}", self.kind.message(), self.loc.0, self.loc.1)
  }
}

impl Error for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
