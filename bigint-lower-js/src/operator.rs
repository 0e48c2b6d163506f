use crate::operator::Arity::*;
use crate::operator::Associativity::*;
use crate::operator::OperatorName::*;
use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  AssignmentAddition,
  AssignmentBitwiseAnd,
  AssignmentBitwiseLeftShift,
  AssignmentBitwiseOr,
  AssignmentBitwiseRightShift,
  AssignmentBitwiseUnsignedRightShift,
  AssignmentBitwiseXor,
  AssignmentDivision,
  AssignmentExponentiation,
  AssignmentLogicalAnd,
  AssignmentLogicalOr,
  AssignmentMultiplication,
  AssignmentNullishCoalescing,
  AssignmentRemainder,
  AssignmentSubtraction,
  Await,
  BitwiseAnd,
  BitwiseLeftShift,
  BitwiseNot,
  BitwiseOr,
  BitwiseRightShift,
  BitwiseUnsignedRightShift,
  BitwiseXor,
  Call,
  Comma,
  ComputedMemberAccess,
  Conditional,
  // Only used during parsing.
  ConditionalAlternate,
  Delete,
  Division,
  Equality,
  Exponentiation,
  GreaterThan,
  GreaterThanOrEqual,
  In,
  Inequality,
  Instanceof,
  LessThan,
  LessThanOrEqual,
  LogicalAnd,
  LogicalNot,
  LogicalOr,
  MemberAccess,
  Multiplication,
  New,
  NullishCoalescing,
  OptionalChainingMemberAccess,
  OptionalChainingComputedMemberAccess,
  OptionalChainingCall,
  PostfixDecrement,
  PostfixIncrement,
  PrefixDecrement,
  PrefixIncrement,
  Remainder,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
  UnaryNegation,
  UnaryPlus,
  Void,
  Yield,
  YieldDelegated,
}

impl OperatorName {
  pub fn is_assignment(self) -> bool {
    matches!(
      self,
      Assignment
        | AssignmentAddition
        | AssignmentBitwiseAnd
        | AssignmentBitwiseLeftShift
        | AssignmentBitwiseOr
        | AssignmentBitwiseRightShift
        | AssignmentBitwiseUnsignedRightShift
        | AssignmentBitwiseXor
        | AssignmentDivision
        | AssignmentExponentiation
        | AssignmentLogicalAnd
        | AssignmentLogicalOr
        | AssignmentMultiplication
        | AssignmentNullishCoalescing
        | AssignmentRemainder
        | AssignmentSubtraction
    )
  }

  pub fn is_update(self) -> bool {
    matches!(
      self,
      PostfixDecrement | PostfixIncrement | PrefixDecrement | PrefixIncrement
    )
  }

  pub fn is_logical(self) -> bool {
    matches!(self, LogicalAnd | LogicalOr | NullishCoalescing)
  }

  /// The operator applied by a compound assignment, e.g. `Addition` for `+=`.
  pub fn compound_operator(self) -> Option<OperatorName> {
    Some(match self {
      AssignmentAddition => Addition,
      AssignmentBitwiseAnd => BitwiseAnd,
      AssignmentBitwiseLeftShift => BitwiseLeftShift,
      AssignmentBitwiseOr => BitwiseOr,
      AssignmentBitwiseRightShift => BitwiseRightShift,
      AssignmentBitwiseUnsignedRightShift => BitwiseUnsignedRightShift,
      AssignmentBitwiseXor => BitwiseXor,
      AssignmentDivision => Division,
      AssignmentExponentiation => Exponentiation,
      AssignmentLogicalAnd => LogicalAnd,
      AssignmentLogicalOr => LogicalOr,
      AssignmentMultiplication => Multiplication,
      AssignmentNullishCoalescing => NullishCoalescing,
      AssignmentRemainder => Remainder,
      AssignmentSubtraction => Subtraction,
      _ => return None,
    })
  }

  /// Source text of the operator, for operators that are written as a single token.
  pub fn syntax(self) -> &'static str {
    match self {
      Addition | UnaryPlus => "+",
      Assignment => "=",
      AssignmentAddition => "+=",
      AssignmentBitwiseAnd => "&=",
      AssignmentBitwiseLeftShift => "<<=",
      AssignmentBitwiseOr => "|=",
      AssignmentBitwiseRightShift => ">>=",
      AssignmentBitwiseUnsignedRightShift => ">>>=",
      AssignmentBitwiseXor => "^=",
      AssignmentDivision => "/=",
      AssignmentExponentiation => "**=",
      AssignmentLogicalAnd => "&&=",
      AssignmentLogicalOr => "||=",
      AssignmentMultiplication => "*=",
      AssignmentNullishCoalescing => "??=",
      AssignmentRemainder => "%=",
      AssignmentSubtraction => "-=",
      Await => "await",
      BitwiseAnd => "&",
      BitwiseLeftShift => "<<",
      BitwiseNot => "~",
      BitwiseOr => "|",
      BitwiseRightShift => ">>",
      BitwiseUnsignedRightShift => ">>>",
      BitwiseXor => "^",
      Comma => ",",
      Delete => "delete",
      Division => "/",
      Equality => "==",
      Exponentiation => "**",
      GreaterThan => ">",
      GreaterThanOrEqual => ">=",
      In => "in",
      Inequality => "!=",
      Instanceof => "instanceof",
      LessThan => "<",
      LessThanOrEqual => "<=",
      LogicalAnd => "&&",
      LogicalNot => "!",
      LogicalOr => "||",
      Multiplication => "*",
      New => "new",
      NullishCoalescing => "??",
      PostfixDecrement | PrefixDecrement => "--",
      PostfixIncrement | PrefixIncrement => "++",
      Remainder => "%",
      StrictEquality => "===",
      StrictInequality => "!==",
      Subtraction | UnaryNegation => "-",
      Typeof => "typeof",
      Void => "void",
      Yield => "yield",
      YieldDelegated => "yield*",
      Call
      | ComputedMemberAccess
      | Conditional
      | ConditionalAlternate
      | MemberAccess
      | OptionalChainingMemberAccess
      | OptionalChainingComputedMemberAccess
      | OptionalChainingCall => "",
    }
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Arity {
  Unary,
  Binary,
  Ternary,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
  Left,
  Right,
}

pub struct Operator {
  pub name: OperatorName,
  pub arity: Arity,
  pub associativity: Associativity,
  pub precedence: u8,
}

const PRECEDENCE_LEVELS: &[&[(OperatorName, Arity, Associativity)]] = &[
  &[
    (MemberAccess, Binary, Left),
    (ComputedMemberAccess, Binary, Left),
    (Call, Binary, Left),
    (New, Unary, Right),
    (OptionalChainingMemberAccess, Binary, Left),
    (OptionalChainingComputedMemberAccess, Binary, Left),
    (OptionalChainingCall, Binary, Left),
  ],
  &[(PostfixIncrement, Unary, Left), (PostfixDecrement, Unary, Left)],
  &[
    (LogicalNot, Unary, Right),
    (BitwiseNot, Unary, Right),
    (UnaryPlus, Unary, Right),
    (UnaryNegation, Unary, Right),
    (PrefixIncrement, Unary, Right),
    (PrefixDecrement, Unary, Right),
    (Typeof, Unary, Right),
    (Void, Unary, Right),
    (Delete, Unary, Right),
    (Await, Unary, Right),
  ],
  &[(Exponentiation, Binary, Right)],
  &[
    (Multiplication, Binary, Left),
    (Division, Binary, Left),
    (Remainder, Binary, Left),
  ],
  &[(Addition, Binary, Left), (Subtraction, Binary, Left)],
  &[
    (BitwiseLeftShift, Binary, Left),
    (BitwiseRightShift, Binary, Left),
    (BitwiseUnsignedRightShift, Binary, Left),
  ],
  &[
    (LessThan, Binary, Left),
    (LessThanOrEqual, Binary, Left),
    (GreaterThan, Binary, Left),
    (GreaterThanOrEqual, Binary, Left),
    (In, Binary, Left),
    (Instanceof, Binary, Left),
  ],
  &[
    (Equality, Binary, Left),
    (Inequality, Binary, Left),
    (StrictEquality, Binary, Left),
    (StrictInequality, Binary, Left),
  ],
  &[(BitwiseAnd, Binary, Left)],
  &[(BitwiseXor, Binary, Left)],
  &[(BitwiseOr, Binary, Left)],
  &[(LogicalAnd, Binary, Left)],
  &[(LogicalOr, Binary, Left), (NullishCoalescing, Binary, Left)],
  &[(Conditional, Ternary, Right)],
  &[
    (Assignment, Binary, Right),
    (AssignmentAddition, Binary, Right),
    (AssignmentBitwiseAnd, Binary, Right),
    (AssignmentBitwiseLeftShift, Binary, Right),
    (AssignmentBitwiseOr, Binary, Right),
    (AssignmentBitwiseRightShift, Binary, Right),
    (AssignmentBitwiseUnsignedRightShift, Binary, Right),
    (AssignmentBitwiseXor, Binary, Right),
    (AssignmentDivision, Binary, Right),
    (AssignmentExponentiation, Binary, Right),
    (AssignmentLogicalAnd, Binary, Right),
    (AssignmentLogicalOr, Binary, Right),
    (AssignmentMultiplication, Binary, Right),
    (AssignmentNullishCoalescing, Binary, Right),
    (AssignmentRemainder, Binary, Right),
    (AssignmentSubtraction, Binary, Right),
    (Yield, Unary, Right),
    (YieldDelegated, Unary, Right),
  ],
  // Given `a, b = true ? c : d = e, f`, the evaluation is `a, (b = (true ? c : (d = e))), e`.
  &[(ConditionalAlternate, Ternary, Right)],
  &[(Comma, Binary, Left)],
];

pub static OPERATORS: Lazy<HashMap<OperatorName, Operator>> = Lazy::new(|| {
  let mut map = HashMap::<OperatorName, Operator>::new();
  for (i, ops) in PRECEDENCE_LEVELS.iter().enumerate() {
    let precedence = (PRECEDENCE_LEVELS.len() - i) as u8;
    for &(name, arity, associativity) in ops.iter() {
      map.insert(name, Operator {
        name,
        arity,
        associativity,
        precedence,
      });
    }
  }
  map
});

pub fn precedence(name: OperatorName) -> u8 {
  OPERATORS[&name].precedence
}
