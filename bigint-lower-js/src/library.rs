//! Operator to library method mapping.

use crate::operator::OperatorName;

/// Arithmetic and bitwise operators with a library method.
pub const BINARY_FUNCTIONS: &[(OperatorName, &str)] = &[
  (OperatorName::Addition, "add"),
  (OperatorName::Subtraction, "subtract"),
  (OperatorName::Multiplication, "multiply"),
  (OperatorName::Division, "divide"),
  (OperatorName::Remainder, "remainder"),
  (OperatorName::Exponentiation, "exponentiate"),
  (OperatorName::BitwiseLeftShift, "leftShift"),
  (OperatorName::BitwiseRightShift, "signedRightShift"),
  (OperatorName::BitwiseAnd, "bitwiseAnd"),
  (OperatorName::BitwiseOr, "bitwiseOr"),
  (OperatorName::BitwiseXor, "bitwiseXor"),
];

/// Comparisons with a library method. Loose equality has none.
pub const RELATIONAL_FUNCTIONS: &[(OperatorName, &str)] = &[
  (OperatorName::LessThan, "lessThan"),
  (OperatorName::GreaterThan, "greaterThan"),
  (OperatorName::LessThanOrEqual, "lessThanOrEqual"),
  (OperatorName::GreaterThanOrEqual, "greaterThanOrEqual"),
  (OperatorName::StrictEquality, "equal"),
  (OperatorName::StrictInequality, "notEqual"),
];

pub const UNARY_FUNCTIONS: &[(OperatorName, &str)] = &[
  (OperatorName::UnaryNegation, "unaryMinus"),
  (OperatorName::BitwiseNot, "bitwiseNot"),
];

fn lookup(table: &[(OperatorName, &'static str)], operator: OperatorName) -> Option<&'static str> {
  table
    .iter()
    .find(|(op, _)| *op == operator)
    .map(|(_, name)| *name)
}

pub fn binary_function(operator: OperatorName) -> Option<&'static str> {
  lookup(BINARY_FUNCTIONS, operator)
}

pub fn relational_function(operator: OperatorName) -> Option<&'static str> {
  lookup(RELATIONAL_FUNCTIONS, operator)
}

pub fn unary_function(operator: OperatorName) -> Option<&'static str> {
  lookup(UNARY_FUNCTIONS, operator)
}
