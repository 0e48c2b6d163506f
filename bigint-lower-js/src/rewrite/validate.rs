//! Rejects constructs the rewriter cannot lower, before anything is changed.

use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::classify::guard::is_guard_typeof;
use crate::err::UnsupportedConstruct;
use crate::operator::OperatorName;
use ahash::HashSet;

pub const EVAL_CODE: &str = "BL1001";
pub const ARGUMENTS_ASSIGNMENT_CODE: &str = "BL1002";
pub const UPDATE_CODE: &str = "BL1003";
pub const TYPEOF_CODE: &str = "BL1004";

/// `typeof` nodes that are part of a `typeof x === "..."` guard.
#[derive(Debug, Default, Clone)]
pub struct GuardSet(HashSet<NodeId>);

impl GuardSet {
  pub fn contains(&self, typeof_node: NodeId) -> bool {
    self.0.contains(&typeof_node)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

fn is_arguments_target(ast: &Ast, target: NodeId) -> bool {
  match ast.stx(target) {
    Syntax::IdPat { name } => name == "arguments",
    Syntax::Member { left: object, .. } | Syntax::ComputedMember { object, .. } => {
      ast.stx(*object).id_name() == Some("arguments")
    }
    _ => false,
  }
}

/// Checks the subtree at `root`, skipping the subtree at `skip`. Returns the recognized guards.
pub fn validate(ast: &Ast, root: NodeId, skip: Option<NodeId>) -> Result<GuardSet, UnsupportedConstruct> {
  let mut guards = GuardSet::default();
  let mut stack = vec![root];
  while let Some(node) = stack.pop() {
    if Some(node) == skip {
      continue;
    };
    let loc = ast.loc(node);
    match ast.stx(node) {
      Syntax::Id { name } | Syntax::IdPat { name } if name == "eval" => {
        return Err(UnsupportedConstruct::new(EVAL_CODE, "`eval` is not supported", loc));
      }
      Syntax::Binary {
        operator, left, ..
      } if operator.is_assignment() && is_arguments_target(ast, *left) => {
        return Err(UnsupportedConstruct::new(
          ARGUMENTS_ASSIGNMENT_CODE,
          "assigning to `arguments` is not supported",
          loc,
        ));
      }
      Syntax::Unary { operator, .. } | Syntax::UnaryPostfix { operator, .. } if operator.is_update() => {
        return Err(
          UnsupportedConstruct::new(UPDATE_CODE, format!("`{}` is not supported", operator.syntax()), loc),
        );
      }
      Syntax::Unary {
        operator: OperatorName::Typeof,
        ..
      } => {
        if !is_guard_typeof(ast, node) {
          return Err(UnsupportedConstruct::new(
            TYPEOF_CODE,
            "`typeof` is only supported in `typeof x === \"...\"` comparisons",
            loc,
          ));
        };
        guards.0.insert(node);
      }
      _ => {}
    };
    stack.extend(ast.children(node).into_iter().rev());
  }
  Ok(guards)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse;

  fn check(code: &str) -> Result<GuardSet, UnsupportedConstruct> {
    let ast = parse(code).unwrap();
    validate(&ast, ast.root(), None)
  }

  #[test]
  fn rejects_unsupported_constructs() {
    assert_eq!(check("eval(\"1n\");").unwrap_err().code, EVAL_CODE);
    assert_eq!(check("function f() { arguments[0] = 1n; }").unwrap_err().code, ARGUMENTS_ASSIGNMENT_CODE);
    assert_eq!(check("function f() { arguments.x += 1n; }").unwrap_err().code, ARGUMENTS_ASSIGNMENT_CODE);
    assert_eq!(check("let x = 0n; x++;").unwrap_err().code, UPDATE_CODE);
    assert_eq!(check("let x = 0n; --x;").unwrap_err().code, UPDATE_CODE);
    assert_eq!(check("let t = typeof x;").unwrap_err().code, TYPEOF_CODE);
    assert_eq!(check("typeof x == \"bigint\";").unwrap_err().code, TYPEOF_CODE);
    assert_eq!(check("typeof o.x === \"bigint\";").unwrap_err().code, TYPEOF_CODE);
  }

  #[test]
  fn reports_location_of_offending_node() {
    let err = check("let a = 1n;\na++;").unwrap_err();
    assert_eq!(err.loc, crate::loc::Loc(12, 15));
  }

  #[test]
  fn collects_guards() {
    let guards = check("if (typeof a === \"bigint\" || typeof b !== \"number\") {} let c = arguments[0];").unwrap();
    assert_eq!(guards.len(), 2);
  }

  #[test]
  fn skipped_subtree_is_not_checked() {
    let ast = parse("let ok = 1; let bad = typeof ok;").unwrap();
    let Syntax::TopLevel { body } = ast.stx(ast.root()) else {
      panic!()
    };
    assert!(validate(&ast, ast.root(), Some(body[1])).is_ok());
    assert!(validate(&ast, ast.root(), None).is_err());
  }
}
