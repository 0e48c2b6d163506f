use crate::diagnostics::Diagnostic;
use crate::diagnostics::FileId;
use crate::error::SyntaxError;
use crate::loc::Loc;
use derive_more::derive::From;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::Utf8Error;

/// A construct the rewriter cannot lower faithfully. The unit is rejected before any change.
///
/// Codes are stable:
/// - `BL1001`: `eval` is referenced.
/// - `BL1002`: `arguments` or one of its members is assigned.
/// - `BL1003`: an update expression (`++`/`--`).
/// - `BL1004`: a `typeof` outside a `typeof x === "..."` comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsupportedConstruct {
  pub code: &'static str,
  pub message: String,
  pub loc: Loc,
}

impl UnsupportedConstruct {
  pub fn new(code: &'static str, message: impl Into<String>, loc: Loc) -> UnsupportedConstruct {
    UnsupportedConstruct {
      code,
      message: message.into(),
      loc,
    }
  }

  pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
    Diagnostic::error(self.code, self.message.clone(), self.loc.to_span(file))
  }
}

impl Display for UnsupportedConstruct {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {} at [{}:{}]", self.code, self.message, self.loc.0, self.loc.1)
  }
}

impl Error for UnsupportedConstruct {}

#[derive(Debug, From)]
pub enum TransformError {
  Syntax(SyntaxError),
  Unsupported(UnsupportedConstruct),
  InvalidUtf8(Utf8Error),
}

impl TransformError {
  pub fn code(&self) -> &'static str {
    match self {
      TransformError::Syntax(err) => err.kind.code(),
      TransformError::Unsupported(err) => err.code,
      TransformError::InvalidUtf8(_) => "BL1000",
    }
  }

  pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
    match self {
      TransformError::Syntax(err) => err.to_diagnostic(file),
      TransformError::Unsupported(err) => err.to_diagnostic(file),
      TransformError::InvalidUtf8(err) => {
        let offset = err.valid_up_to();
        Diagnostic::error(
          self.code(),
          "source is not valid UTF-8",
          Loc(offset, offset + 1).to_span(file),
        )
      }
    }
  }
}

impl Display for TransformError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      TransformError::Syntax(err) => write!(f, "syntax error: {}", err),
      TransformError::Unsupported(err) => write!(f, "unsupported construct: {}", err),
      TransformError::InvalidUtf8(err) => write!(f, "invalid UTF-8: {}", err),
    }
  }
}

impl Error for TransformError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      TransformError::Syntax(err) => Some(err),
      TransformError::Unsupported(err) => Some(err),
      TransformError::InvalidUtf8(err) => Some(err),
    }
  }
}

pub type TransformResult<T> = Result<T, TransformError>;
