//! Recognizes the runtime type tests the classifier trusts.

use crate::ast::stx::FuncBody;
use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::operator::OperatorName;
use crate::LIBRARY_NAMESPACE;

fn is_id(ast: &Ast, node: NodeId, name: &str) -> bool {
  matches!(ast.stx(node), Syntax::Id { name: n } if n == name)
}

fn is_instanceof_library(ast: &Ast, node: NodeId, name: &str) -> bool {
  match ast.stx(node) {
    Syntax::Binary {
      operator: OperatorName::Instanceof,
      left,
      right,
    } => is_id(ast, *left, name) && is_id(ast, *right, LIBRARY_NAMESPACE),
    _ => false,
  }
}

/// Whether `typeof_node` is `typeof <identifier>` compared by `===` or `!==` to a string literal.
/// These are the only `typeof` uses the rewriter can carry through.
pub fn is_guard_typeof(ast: &Ast, typeof_node: NodeId) -> bool {
  let Syntax::Unary {
    operator: OperatorName::Typeof,
    argument,
  } = ast.stx(typeof_node)
  else {
    return false;
  };
  if !matches!(ast.stx(*argument), Syntax::Id { .. }) {
    return false;
  };
  let Some(parent) = ast.parent(typeof_node) else {
    return false;
  };
  matches!(
    ast.stx(parent),
    Syntax::Binary {
      operator: OperatorName::StrictEquality | OperatorName::StrictInequality,
      left,
      right,
    } if *left == typeof_node && matches!(ast.stx(*right), Syntax::LitStr { .. })
  )
}

/// `typeof name === "ty"`, or `!==` when `negated`. For `"bigint"` the library form left behind
/// by the rewriter also matches: `name instanceof JSBI` and `!(name instanceof JSBI)`.
pub fn is_typeof_check(ast: &Ast, node: NodeId, name: &str, ty: &str, negated: bool) -> bool {
  let expected = if negated {
    OperatorName::StrictInequality
  } else {
    OperatorName::StrictEquality
  };
  match ast.stx(node) {
    Syntax::Binary {
      operator,
      left,
      right,
    } if *operator == expected => {
      let typeof_matches = matches!(
        ast.stx(*left),
        Syntax::Unary { operator: OperatorName::Typeof, argument } if is_id(ast, *argument, name)
      );
      let type_matches = matches!(ast.stx(*right), Syntax::LitStr { value } if value == ty);
      if typeof_matches && type_matches {
        return true;
      };
    }
    _ => {}
  };
  if ty != "bigint" {
    return false;
  };
  if negated {
    matches!(
      ast.stx(node),
      Syntax::Unary { operator: OperatorName::LogicalNot, argument }
        if is_instanceof_library(ast, *argument, name)
    )
  } else {
    is_instanceof_library(ast, node, name)
  }
}

/// A negated check, or an `||` chain with a negated check somewhere in it.
pub fn is_negated_check(ast: &Ast, node: NodeId, name: &str, ty: &str) -> bool {
  if is_typeof_check(ast, node, name, ty, true) {
    return true;
  };
  match ast.stx(node) {
    Syntax::Binary {
      operator: OperatorName::LogicalOr,
      left,
      right,
    } => is_negated_check(ast, *left, name, ty) || is_negated_check(ast, *right, name, ty),
    _ => false,
  }
}

/// The test of `func`'s first statement when that statement is an `if` whose consequent is
/// exactly one `throw`, bare or in a block.
pub fn leading_throw_guard(ast: &Ast, func: NodeId) -> Option<NodeId> {
  let Syntax::Function {
    body: FuncBody::Block(stmts),
    ..
  } = ast.stx(func)
  else {
    return None;
  };
  let Syntax::If {
    test, consequent, ..
  } = ast.stx(*stmts.first()?)
  else {
    return None;
  };
  let throws = match ast.stx(*consequent) {
    Syntax::Throw { .. } => true,
    Syntax::Block { body } => {
      body.len() == 1 && matches!(ast.stx(body[0]), Syntax::Throw { .. })
    }
    _ => false,
  };
  throws.then_some(*test)
}

/// The nearest enclosing `if` of `read`, provided the read lies in its test or consequent.
pub fn narrowing_if(ast: &Ast, read: NodeId) -> Option<NodeId> {
  let mut prev = read;
  for ancestor in ast.ancestors(read) {
    if let Syntax::If {
      test, consequent, ..
    } = ast.stx(ancestor)
    {
      return (prev == *test || prev == *consequent).then_some(ancestor);
    };
    prev = ancestor;
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse;

  fn first_expr(ast: &Ast) -> NodeId {
    let Syntax::TopLevel { body } = ast.stx(ast.root()) else {
      panic!()
    };
    match ast.stx(body[0]) {
      Syntax::ExprStmt { expression } => *expression,
      other => panic!("expected expression statement, got {:?}", other),
    }
  }

  #[test]
  fn typeof_checks() {
    let ast = parse("typeof x === \"bigint\";").unwrap();
    let node = first_expr(&ast);
    assert!(is_typeof_check(&ast, node, "x", "bigint", false));
    assert!(!is_typeof_check(&ast, node, "x", "bigint", true));
    assert!(!is_typeof_check(&ast, node, "y", "bigint", false));
    assert!(!is_typeof_check(&ast, node, "x", "number", false));

    let ast = parse("!(x instanceof JSBI);").unwrap();
    assert!(is_typeof_check(&ast, first_expr(&ast), "x", "bigint", true));
    let ast = parse("x instanceof JSBI;").unwrap();
    assert!(is_typeof_check(&ast, first_expr(&ast), "x", "bigint", false));
    assert!(!is_typeof_check(&ast, first_expr(&ast), "x", "number", false));
  }

  #[test]
  fn negated_checks_inside_or_chains() {
    let ast = parse("a < 0 || typeof b !== \"number\" || c;").unwrap();
    let node = first_expr(&ast);
    assert!(is_negated_check(&ast, node, "b", "number"));
    assert!(!is_negated_check(&ast, node, "a", "number"));
    assert!(!is_negated_check(&ast, node, "b", "bigint"));
  }

  #[test]
  fn leading_throw_guards() {
    let ast = parse("function f(a) { if (typeof a !== \"bigint\") throw new TypeError(); return a; }").unwrap();
    let Syntax::TopLevel { body } = ast.stx(ast.root()) else {
      panic!()
    };
    let test = leading_throw_guard(&ast, body[0]).unwrap();
    assert!(is_negated_check(&ast, test, "a", "bigint"));

    let ast = parse("function f(a) { if (a) { log(); throw 1; } }").unwrap();
    let Syntax::TopLevel { body } = ast.stx(ast.root()) else {
      panic!()
    };
    assert!(leading_throw_guard(&ast, body[0]).is_none());
  }

  #[test]
  fn guard_typeofs() {
    let ast = parse("typeof x === \"bigint\";").unwrap();
    let Syntax::Binary { left, .. } = ast.stx(first_expr(&ast)) else {
      panic!()
    };
    assert!(is_guard_typeof(&ast, *left));

    let ast = parse("typeof x;").unwrap();
    assert!(!is_guard_typeof(&ast, first_expr(&ast)));
  }
}
