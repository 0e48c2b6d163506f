//! Token kinds and their source spellings.

use crate::error::SyntaxError;
use crate::error::SyntaxErrorKind;
use crate::loc::Loc;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TokenKind {
  End,
  /// Text that does not form a token, such as an unterminated comment. The parser reports it
  /// when it reaches it.
  Invalid,
  Ident,

  BigInt,
  Number,
  Regex,
  Str,
  /// Template text running up to and including a `${`.
  TemplateChunk,
  /// Template text running up to and including the closing backtick.
  TemplateEnd,

  Amp,
  AmpAmp,
  AmpAmpEq,
  AmpEq,
  Arrow,
  Bang,
  BangEq,
  BangEqEq,
  Caret,
  CaretEq,
  Colon,
  Comma,
  Dot,
  Ellipsis,
  Eq,
  EqEq,
  EqEqEq,
  Gt,
  GtEq,
  LBrace,
  LBracket,
  LParen,
  Lt,
  LtEq,
  Minus,
  MinusEq,
  MinusMinus,
  Nullish,
  NullishEq,
  OptBracket,
  OptDot,
  OptParen,
  Percent,
  PercentEq,
  Pipe,
  PipeEq,
  PipePipe,
  PipePipeEq,
  Plus,
  PlusEq,
  PlusPlus,
  Question,
  RBrace,
  RBracket,
  RParen,
  Semicolon,
  Shl,
  ShlEq,
  Shr,
  ShrEq,
  Slash,
  SlashEq,
  Star,
  StarEq,
  StarStar,
  StarStarEq,
  Tilde,
  UShr,
  UShrEq,

  As,
  Async,
  Await,
  Break,
  Case,
  Catch,
  Class,
  Const,
  Continue,
  Debugger,
  Default,
  Delete,
  Do,
  Else,
  Export,
  Extends,
  False,
  Finally,
  For,
  From,
  Function,
  Get,
  If,
  Import,
  In,
  Instanceof,
  Let,
  New,
  Null,
  Of,
  Return,
  Set,
  Static,
  Super,
  Switch,
  This,
  Throw,
  True,
  Try,
  Typeof,
  Var,
  Void,
  While,
  With,
  Yield,
}

use TokenKind::*;

/// Every punctuator. `/` and `/=` are included; the lexer decides whether they start a regex.
pub const PUNCTUATORS: &[(&str, TokenKind)] = &[
  ("&", Amp),
  ("&&", AmpAmp),
  ("&&=", AmpAmpEq),
  ("&=", AmpEq),
  ("=>", Arrow),
  ("!", Bang),
  ("!=", BangEq),
  ("!==", BangEqEq),
  ("^", Caret),
  ("^=", CaretEq),
  (":", Colon),
  (",", Comma),
  (".", Dot),
  ("...", Ellipsis),
  ("=", Eq),
  ("==", EqEq),
  ("===", EqEqEq),
  (">", Gt),
  (">=", GtEq),
  ("{", LBrace),
  ("[", LBracket),
  ("(", LParen),
  ("<", Lt),
  ("<=", LtEq),
  ("-", Minus),
  ("-=", MinusEq),
  ("--", MinusMinus),
  ("??", Nullish),
  ("??=", NullishEq),
  ("?.[", OptBracket),
  ("?.", OptDot),
  ("?.(", OptParen),
  ("%", Percent),
  ("%=", PercentEq),
  ("|", Pipe),
  ("|=", PipeEq),
  ("||", PipePipe),
  ("||=", PipePipeEq),
  ("+", Plus),
  ("+=", PlusEq),
  ("++", PlusPlus),
  ("?", Question),
  ("}", RBrace),
  ("]", RBracket),
  (")", RParen),
  (";", Semicolon),
  ("<<", Shl),
  ("<<=", ShlEq),
  (">>", Shr),
  (">>=", ShrEq),
  ("/", Slash),
  ("/=", SlashEq),
  ("*", Star),
  ("*=", StarEq),
  ("**", StarStar),
  ("**=", StarStarEq),
  ("~", Tilde),
  (">>>", UShr),
  (">>>=", UShrEq),
];

pub const KEYWORDS: &[(&str, TokenKind)] = &[
  ("as", As),
  ("async", Async),
  ("await", Await),
  ("break", Break),
  ("case", Case),
  ("catch", Catch),
  ("class", Class),
  ("const", Const),
  ("continue", Continue),
  ("debugger", Debugger),
  ("default", Default),
  ("delete", Delete),
  ("do", Do),
  ("else", Else),
  ("export", Export),
  ("extends", Extends),
  ("false", False),
  ("finally", Finally),
  ("for", For),
  ("from", From),
  ("function", Function),
  ("get", Get),
  ("if", If),
  ("import", Import),
  ("in", In),
  ("instanceof", Instanceof),
  ("let", Let),
  ("new", New),
  ("null", Null),
  ("of", Of),
  ("return", Return),
  ("set", Set),
  ("static", Static),
  ("super", Super),
  ("switch", Switch),
  ("this", This),
  ("throw", Throw),
  ("true", True),
  ("try", Try),
  ("typeof", Typeof),
  ("var", Var),
  ("void", Void),
  ("while", While),
  ("with", With),
  ("yield", Yield),
];

impl TokenKind {
  pub fn is_keyword(self) -> bool {
    self >= As
  }

  /// Contextual keywords (`as`, `async`, `from`, `get`, `let`, `of`, `set`, `static`) also name
  /// bindings.
  pub fn is_identifier_like(self) -> bool {
    matches!(self, Ident | As | Async | From | Get | Let | Of | Set | Static)
  }

  /// Source spelling of a punctuator or keyword.
  pub fn spelling(self) -> Option<&'static str> {
    PUNCTUATORS
      .iter()
      .chain(KEYWORDS)
      .find(|&&(_, kind)| kind == self)
      .map(|&(text, _)| text)
  }
}

#[derive(Copy, Clone, Debug)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: Loc,
  /// A line terminator occurs between the previous token and this one, including inside a
  /// multi-line comment.
  pub newline_before: bool,
}

impl Token {
  pub fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
    SyntaxError::new(kind, self.loc, Some(self.kind))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keywords_follow_every_other_kind() {
    for &(text, kind) in KEYWORDS {
      assert!(kind.is_keyword(), "{}", text);
    }
    for &(text, kind) in PUNCTUATORS {
      assert!(!kind.is_keyword(), "{}", text);
    }
    assert!(!Ident.is_keyword());
  }

  #[test]
  fn spellings() {
    assert_eq!(UShrEq.spelling(), Some(">>>="));
    assert_eq!(Instanceof.spelling(), Some("instanceof"));
    assert_eq!(Ident.spelling(), None);
  }
}
