//! Inserts the library import and the runtime dispatch shim.
//!
//! Both are generated as source text and parsed into the unit's arena, after rewriting, so they are
//! never lowered themselves.

use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::error::SyntaxResult;
use crate::lex::Lexer;
use crate::library::BINARY_FUNCTIONS;
use crate::library::RELATIONAL_FUNCTIONS;
use crate::library::UNARY_FUNCTIONS;
use crate::operator::OperatorName;
use crate::parse::Parser;
use crate::token::TokenKind;
use crate::DISPATCH_SHIM_NAMESPACE;
use crate::LIBRARY_IMPORT_SPECIFIER;
use crate::LIBRARY_NAMESPACE;
use itertools::Itertools;
use tracing::debug;

/// What [`inject`] added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Injection {
  pub import: bool,
  pub shim: bool,
}

fn top_level_body(ast: &Ast) -> &[NodeId] {
  match ast.stx(ast.root()) {
    Syntax::TopLevel { body } => body,
    _ => &[],
  }
}

/// The top-level `var maybeJSBI = ...` statement, if the unit has one.
pub fn find_dispatch_shim(ast: &Ast) -> Option<NodeId> {
  top_level_body(ast).iter().copied().find(|&stmt| {
    let Syntax::VarDecl { declarators, .. } = ast.stx(stmt) else {
      return false;
    };
    declarators.iter().any(|&d| {
      matches!(
        ast.stx(d),
        Syntax::VarDeclarator { pattern, .. } if ast.stx(*pattern).id_name() == Some(DISPATCH_SHIM_NAMESPACE)
      )
    })
  })
}

pub fn has_library_import(ast: &Ast) -> bool {
  top_level_body(ast)
    .iter()
    .any(|&stmt| matches!(ast.stx(stmt), Syntax::Import { module, .. } if module == LIBRARY_IMPORT_SPECIFIER))
}

pub fn import_source() -> String {
  format!(
    "import {} from \"{}\";\n",
    LIBRARY_NAMESPACE, LIBRARY_IMPORT_SPECIFIER
  )
}

/// Source of the `var maybeJSBI = {...};` declaration. Each function calls the library when its
/// operands are library values and applies the native operator otherwise.
pub fn shim_source() -> String {
  let lib = LIBRARY_NAMESPACE;
  let both_objects = "typeof a === \"object\" && typeof b === \"object\"";
  let mut members = vec![format!(
    "toNumber: function toNumber(a) {{ return typeof a === \"object\" ? {lib}.toNumber(a) : Number(a); }}"
  )];
  for &(operator, name) in BINARY_FUNCTIONS.iter().chain(RELATIONAL_FUNCTIONS) {
    let native = if operator == OperatorName::Exponentiation {
      // `**` on numbers would be a syntax error in engines without BigInt support.
      "typeof a === \"bigint\" && typeof b === \"bigint\" ? new Function(\"a\", \"b\", \"return a**b\")(a, b) : Math.pow(a, b)"
        .to_string()
    } else {
      format!("a {} b", operator.syntax())
    };
    members.push(format!(
      "{name}: function {name}(a, b) {{ return {both_objects} ? {lib}.{name}(a, b) : {native}; }}"
    ));
  }
  for &(operator, name) in UNARY_FUNCTIONS {
    members.push(format!(
      "{name}: function {name}(a) {{ return typeof a === \"object\" ? {lib}.{name}(a) : {}a; }}",
      operator.syntax()
    ));
  }
  format!(
    "var {} = {{\n  {}\n}};\n",
    DISPATCH_SHIM_NAMESPACE,
    members.iter().join(",\n  ")
  )
}

/// Parses `source` as statements into `ast`. The tree is handed back even when parsing fails.
fn parse_into(ast: &mut Ast, source: &str) -> SyntaxResult<Vec<NodeId>> {
  let mut parser = Parser::with_ast(Lexer::new(source), std::mem::take(ast));
  let result = parser.parse_stmts(TokenKind::End);
  *ast = parser.into_ast();
  result
}

/// Prepends the library import unless one exists, followed by the dispatch shim when
/// `uses_dispatch_shim` is set and the unit does not already declare it.
pub fn inject(ast: &mut Ast, uses_dispatch_shim: bool) -> SyntaxResult<Injection> {
  let injection = Injection {
    import: !has_library_import(ast),
    shim: uses_dispatch_shim && find_dispatch_shim(ast).is_none(),
  };
  let mut source = String::new();
  if injection.import {
    source.push_str(&import_source());
  }
  if injection.shim {
    source.push_str(&shim_source());
  }
  if source.is_empty() {
    return Ok(injection);
  }
  let stmts = parse_into(ast, &source)?;
  let root = ast.root();
  let Syntax::TopLevel { body } = ast.stx(root) else {
    return Ok(Injection::default());
  };
  let body = stmts.into_iter().chain(body.iter().copied()).collect();
  ast.replace(root, Syntax::TopLevel { body });
  debug!(
    target: "bigint_lower_js::rewrite",
    import = injection.import,
    shim = injection.shim,
    "injected library declarations"
  );
  Ok(injection)
}
