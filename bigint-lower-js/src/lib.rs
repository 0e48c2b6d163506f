//! Lowers JavaScript BigInt syntax to calls against the JSBI library.
//!
//! Literals and operators whose operands are known to be BigInts become `JSBI.<method>(...)` calls,
//! native arithmetic is left alone, and operators whose operand types cannot be decided are routed
//! through a small `maybeJSBI` object that dispatches at runtime.

use ast::Ast;
use diagnostics::Diagnostic;
use diagnostics::FileId;
use err::TransformResult;
use error::SyntaxResult;
use lex::Lexer;
use parse::Parser;
use rewrite::Rewriter;
use shim::Injection;
use tracing::debug;

pub mod ast;
pub mod char;
pub mod classify;
pub mod diagnostics;
pub mod emit;
pub mod err;
pub mod error;
pub mod lex;
pub mod library;
pub mod loc;
pub mod operator;
pub mod parse;
pub mod rewrite;
pub mod shim;
pub mod symbol;
pub mod token;

pub const LIBRARY_IMPORT_SPECIFIER: &str = "jsbi";
pub const LIBRARY_NAMESPACE: &str = "JSBI";
pub const DISPATCH_SHIM_NAMESPACE: &str = "maybeJSBI";

/// Parses a unit into a fresh [`Ast`].
pub fn parse(source: &str) -> SyntaxResult<Ast> {
  let mut parser = Parser::new(Lexer::new(source));
  parser.parse_top_level()?;
  Ok(parser.into_ast())
}

#[derive(Clone, Copy, Debug)]
pub struct TransformOptions {
  /// File that diagnostic spans point into.
  pub file: FileId,
  /// Whether classifier warnings are returned. Errors are always reported.
  pub collect_diagnostics: bool,
}

impl Default for TransformOptions {
  fn default() -> Self {
    TransformOptions {
      file: FileId(0),
      collect_diagnostics: true,
    }
  }
}

impl TransformOptions {
  pub fn with_file(mut self, file: FileId) -> Self {
    self.file = file;
    self
  }

  pub fn with_diagnostics(mut self, collect: bool) -> Self {
    self.collect_diagnostics = collect;
    self
  }
}

/// Result of lowering a parsed unit in place.
#[derive(Debug, Default)]
pub struct TransformReport {
  pub replacements: usize,
  pub injection: Injection,
  /// Sorted by location.
  pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct TransformOutput {
  pub code: String,
  pub replacements: usize,
  pub diagnostics: Vec<Diagnostic>,
}

/// Lowers an already parsed unit. The tree is only changed when the whole unit is accepted.
pub struct Transformer<'a> {
  ast: &'a mut Ast,
  options: TransformOptions,
}

impl<'a> Transformer<'a> {
  pub fn new(ast: &'a mut Ast, options: TransformOptions) -> Transformer<'a> {
    Transformer { ast, options }
  }

  pub fn run(self) -> TransformResult<TransformReport> {
    let skip = shim::find_dispatch_shim(self.ast);
    let mut bindings = symbol::bind(self.ast);
    let outcome = Rewriter::new(self.ast, &mut bindings, self.options.file).run(skip)?;
    let injection = shim::inject(self.ast, outcome.uses_dispatch_shim)?;
    let mut diagnostics = if self.options.collect_diagnostics {
      outcome.diagnostics
    } else {
      Vec::new()
    };
    diagnostics.sort_by_key(|d| d.primary);
    debug!(
      target: "bigint_lower_js::rewrite",
      replacements = outcome.replacements,
      warnings = diagnostics.len(),
      "lowered unit"
    );
    Ok(TransformReport {
      replacements: outcome.replacements,
      injection,
      diagnostics,
    })
  }
}

/// Parses, lowers and prints a unit.
///
/// # Examples
///
/// ```
/// use bigint_lower_js::{transform, TransformOptions};
///
/// let out = transform(&TransformOptions::default(), "const a = 1n + 2n;").unwrap();
/// assert_eq!(
///   out.code,
///   "import JSBI from \"jsbi\";\nconst a = JSBI.add(JSBI.BigInt(1), JSBI.BigInt(2));\n"
/// );
/// ```
pub fn transform(options: &TransformOptions, source: &str) -> TransformResult<TransformOutput> {
  let mut ast = parse(source)?;
  let report = Transformer::new(&mut ast, *options).run()?;
  Ok(TransformOutput {
    code: emit::emit(&ast),
    replacements: report.replacements,
    diagnostics: report.diagnostics,
  })
}

/// Like [`transform`], for source that still has to be decoded as UTF-8.
pub fn transform_bytes(options: &TransformOptions, source: &[u8]) -> TransformResult<TransformOutput> {
  let source = std::str::from_utf8(source)?;
  transform(options, source)
}
