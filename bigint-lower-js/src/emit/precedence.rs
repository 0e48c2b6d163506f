use crate::ast::stx::FuncKind;
use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;

/// Wrapper around a precedence value with total ordering.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Prec(u8);

impl Prec {
  pub const LOWEST: Prec = Prec(0);

  pub const fn new(value: u8) -> Self {
    Prec(value)
  }

  pub const fn tighter(self) -> Self {
    Prec(self.0 + 1)
  }

  pub const fn value(self) -> u8 {
    self.0
  }
}

/// Precedence for member access, calls and `new` with arguments.
pub const CALL_MEMBER_PRECEDENCE: Prec = Prec::new(18);
/// Precedence for atomic expressions (identifiers, literals, etc.).
pub const PRIMARY_PRECEDENCE: Prec = Prec::new(19);
/// Arrow functions only appear unparenthesized where an assignment expression may.
pub const ARROW_FUNCTION_PRECEDENCE: Prec = Prec::new(3);
/// Minimum for call arguments, array elements, initializers and other assignment-expression slots.
pub const ASSIGNMENT_PRECEDENCE: Prec = Prec::new(3);
/// Minimum for the operand of a prefix operator.
pub const UNARY_PRECEDENCE: Prec = Prec::new(16);
/// Comma expressions are allowed.
pub const EXPRESSION_PRECEDENCE: Prec = Prec::new(1);

#[derive(Clone, Copy, Debug)]
pub enum Side {
  Left,
  Right,
}

pub fn needs_parens(child_prec: Prec, min_prec: Prec) -> bool {
  child_prec < min_prec
}

pub fn operator_prec(op: OperatorName) -> Prec {
  OPERATORS
    .get(&op)
    .map(|operator| Prec::new(operator.precedence))
    .unwrap_or(PRIMARY_PRECEDENCE)
}

pub fn child_min_prec_for_binary(op: OperatorName, side: Side) -> Prec {
  let Some(operator) = OPERATORS.get(&op) else {
    return PRIMARY_PRECEDENCE;
  };
  let prec = Prec::new(operator.precedence);
  match operator.associativity {
    Associativity::Left => match side {
      Side::Left => prec,
      Side::Right => prec.tighter(),
    },
    Associativity::Right => match side {
      Side::Left => prec.tighter(),
      Side::Right => prec,
    },
  }
}

/// Returns the precedence of an expression node. This is derived from the parser's precedence table
/// so that the output re-parses to the same tree.
pub fn expr_prec(ast: &Ast, node: NodeId) -> Prec {
  match ast.stx(node) {
    Syntax::Binary { operator, .. } => operator_prec(*operator),
    Syntax::Cond { .. } => operator_prec(OperatorName::Conditional),
    Syntax::Unary { operator, .. } | Syntax::UnaryPostfix { operator, .. } => operator_prec(*operator),
    Syntax::Call { .. }
    | Syntax::Member { .. }
    | Syntax::ComputedMember { .. }
    | Syntax::TaggedTemplate { .. }
    | Syntax::New { .. } => CALL_MEMBER_PRECEDENCE,
    Syntax::Function {
      kind: FuncKind::Arrow,
      ..
    } => ARROW_FUNCTION_PRECEDENCE,
    _ => PRIMARY_PRECEDENCE,
  }
}

/// `??` cannot be mixed with `&&` or `||` without parentheses.
pub fn mixes_nullish(ast: &Ast, parent: OperatorName, child: NodeId) -> bool {
  let Syntax::Binary { operator, .. } = ast.stx(child) else {
    return false;
  };
  match parent {
    OperatorName::NullishCoalescing => {
      matches!(operator, OperatorName::LogicalAnd | OperatorName::LogicalOr)
    }
    OperatorName::LogicalAnd | OperatorName::LogicalOr => *operator == OperatorName::NullishCoalescing,
    _ => false,
  }
}

/// The node whose text starts the printed form of `node`.
pub fn leftmost(ast: &Ast, node: NodeId) -> NodeId {
  let mut current = node;
  loop {
    current = match ast.stx(current) {
      Syntax::Binary { left, .. } => *left,
      Syntax::Cond { test, .. } => *test,
      Syntax::Call { callee, .. } => *callee,
      Syntax::Member { left, .. } => *left,
      Syntax::ComputedMember { object, .. } => *object,
      Syntax::TaggedTemplate { function, .. } => *function,
      Syntax::UnaryPostfix { argument, .. } => *argument,
      _ => return current,
    };
  }
}

/// Whether an expression in statement position would be read as a block, declaration or `let`
/// declaration, and so has to be parenthesized.
pub fn expr_stmt_needs_parens(ast: &Ast, expr: NodeId) -> bool {
  let first = leftmost(ast, expr);
  match ast.stx(first) {
    Syntax::LitObj { .. } | Syntax::ObjPat { .. } | Syntax::Class { .. } => true,
    Syntax::Function { kind, .. } => *kind != FuncKind::Arrow,
    Syntax::Id { name } => {
      name == "let"
        && ast
          .parent(first)
          .is_some_and(|p| matches!(ast.stx(p), Syntax::ComputedMember { .. }))
    }
    _ => false,
  }
}

pub fn starts_with_optional_chaining(ast: &Ast, node: NodeId) -> bool {
  match ast.stx(node) {
    Syntax::Member {
      optional_chaining,
      left,
      ..
    } => *optional_chaining || starts_with_optional_chaining(ast, *left),
    Syntax::ComputedMember {
      optional_chaining,
      object,
      ..
    } => *optional_chaining || starts_with_optional_chaining(ast, *object),
    Syntax::Call {
      optional_chaining,
      callee,
      ..
    } => *optional_chaining || starts_with_optional_chaining(ast, *callee),
    _ => false,
  }
}

/// Whether a `new` callee contains a call that would otherwise take over the `new` arguments.
pub fn new_callee_needs_parens(ast: &Ast, callee: NodeId) -> bool {
  let mut current = callee;
  loop {
    current = match ast.stx(current) {
      Syntax::Call { .. } | Syntax::TaggedTemplate { .. } => return true,
      Syntax::Member { left, .. } => *left,
      Syntax::ComputedMember { object, .. } => *object,
      _ => return false,
    };
  }
}
