use crate::operator::Operator;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::TokenKind;

/// The operator a token introduces when it follows an operand. Besides binary and assignment
/// operators this covers `?`, calls and member accesses, which the Pratt loop treats alike.
pub fn infix_operator(kind: TokenKind) -> Option<&'static Operator> {
  use OperatorName::*;
  let name = match kind {
    TokenKind::Amp => BitwiseAnd,
    TokenKind::AmpAmp => LogicalAnd,
    TokenKind::AmpAmpEq => AssignmentLogicalAnd,
    TokenKind::AmpEq => AssignmentBitwiseAnd,
    TokenKind::BangEq => Inequality,
    TokenKind::BangEqEq => StrictInequality,
    TokenKind::Caret => BitwiseXor,
    TokenKind::CaretEq => AssignmentBitwiseXor,
    TokenKind::Comma => Comma,
    TokenKind::Dot => MemberAccess,
    TokenKind::Eq => Assignment,
    TokenKind::EqEq => Equality,
    TokenKind::EqEqEq => StrictEquality,
    TokenKind::Gt => GreaterThan,
    TokenKind::GtEq => GreaterThanOrEqual,
    TokenKind::In => In,
    TokenKind::Instanceof => Instanceof,
    TokenKind::LBracket => ComputedMemberAccess,
    TokenKind::LParen => Call,
    TokenKind::Lt => LessThan,
    TokenKind::LtEq => LessThanOrEqual,
    TokenKind::Minus => Subtraction,
    TokenKind::MinusEq => AssignmentSubtraction,
    TokenKind::Nullish => NullishCoalescing,
    TokenKind::NullishEq => AssignmentNullishCoalescing,
    TokenKind::OptBracket => OptionalChainingComputedMemberAccess,
    TokenKind::OptDot => OptionalChainingMemberAccess,
    TokenKind::OptParen => OptionalChainingCall,
    TokenKind::Percent => Remainder,
    TokenKind::PercentEq => AssignmentRemainder,
    TokenKind::Pipe => BitwiseOr,
    TokenKind::PipeEq => AssignmentBitwiseOr,
    TokenKind::PipePipe => LogicalOr,
    TokenKind::PipePipeEq => AssignmentLogicalOr,
    TokenKind::Plus => Addition,
    TokenKind::PlusEq => AssignmentAddition,
    TokenKind::Question => Conditional,
    TokenKind::Shl => BitwiseLeftShift,
    TokenKind::ShlEq => AssignmentBitwiseLeftShift,
    TokenKind::Shr => BitwiseRightShift,
    TokenKind::ShrEq => AssignmentBitwiseRightShift,
    TokenKind::Slash => Division,
    TokenKind::SlashEq => AssignmentDivision,
    TokenKind::Star => Multiplication,
    TokenKind::StarEq => AssignmentMultiplication,
    TokenKind::StarStar => Exponentiation,
    TokenKind::StarStarEq => AssignmentExponentiation,
    TokenKind::UShr => BitwiseUnsignedRightShift,
    TokenKind::UShrEq => AssignmentBitwiseUnsignedRightShift,
    _ => return None,
  };
  OPERATORS.get(&name)
}

/// Prefix operators. `new` and postfix updates are parsed separately.
pub fn prefix_operator(kind: TokenKind) -> Option<&'static Operator> {
  use OperatorName::*;
  let name = match kind {
    TokenKind::Await => Await,
    TokenKind::Bang => LogicalNot,
    TokenKind::Delete => Delete,
    TokenKind::Minus => UnaryNegation,
    TokenKind::MinusMinus => PrefixDecrement,
    TokenKind::Plus => UnaryPlus,
    TokenKind::PlusPlus => PrefixIncrement,
    TokenKind::Tilde => BitwiseNot,
    TokenKind::Typeof => Typeof,
    TokenKind::Void => Void,
    TokenKind::Yield => Yield,
    _ => return None,
  };
  OPERATORS.get(&name)
}
