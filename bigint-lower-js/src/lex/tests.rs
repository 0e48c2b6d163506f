use super::LexGoal;
use super::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TokenKind;
use crate::token::TokenKind::*;

fn tokens(code: &str, goal: LexGoal) -> Vec<Token> {
  let mut lexer = Lexer::new(code);
  let mut out = Vec::new();
  loop {
    let t = lexer.next_token(goal);
    if t.kind == End {
      return out;
    }
    out.push(t);
  }
}

#[track_caller]
fn assert_kinds(code: &str, expected: &[TokenKind]) {
  let actual: Vec<_> = tokens(code, LexGoal::Div).into_iter().map(|t| t.kind).collect();
  assert_eq!(actual, expected, "lexing {:?}", code);
}

#[test]
fn keywords_and_identifiers() {
  assert_kinds("typeof x instanceof JSBI", &[Typeof, Ident, Instanceof, Ident]);
  assert_kinds("typeofx maybeJSBI $_a1", &[Ident, Ident, Ident]);
  // Escaped keywords stay identifiers.
  assert_kinds("t\\u0079peof \\u{74}his", &[Ident, Ident]);
}

#[test]
fn numeric_literals() {
  assert_kinds("1n 0n 0x1Fn 0o17n 0b101n", &[BigInt, BigInt, BigInt, BigInt, BigInt]);
  assert_kinds("9007199254740993n 1_000n", &[BigInt, BigInt]);
  assert_kinds("1.5 .5 1e-7 0x1F", &[Number, Number, Number, Number]);
  // Separator placement is checked by the parser.
  assert_kinds("1_n", &[BigInt]);
}

#[test]
fn punctuators_take_the_longest_match() {
  assert_kinds("a ** b", &[Ident, StarStar, Ident]);
  assert_kinds("a >>>= b >> c", &[Ident, UShrEq, Ident, Shr, Ident]);
  assert_kinds("a !== b", &[Ident, BangEqEq, Ident]);
  assert_kinds("a?.b?.[c]?.(d)", &[Ident, OptDot, Ident, OptBracket, Ident, RBracket, OptParen, Ident, RParen]);
  assert_kinds("a?.5:1", &[Ident, Question, Number, Colon, Number]);
  assert_kinds("#x", &[Invalid, Ident]);
}

#[test]
fn strings_templates_and_comments() {
  assert_kinds("'a\\'b' \"bigint\" // trailing", &[Str, Str]);
  assert_kinds("/* a */ x /* b\n */ y", &[Ident, Ident]);
  assert_kinds("`a${", &[TemplateChunk]);
  assert_kinds("`plain`", &[TemplateEnd]);
  assert_kinds("'open\n'", &[Invalid, Invalid]);
}

#[test]
fn unterminated_block_comment_is_invalid() {
  let ts = tokens("a /* never closed", LexGoal::Div);
  assert_eq!(ts.len(), 2);
  assert_eq!(ts[1].kind, Invalid);
  assert_eq!(ts[1].loc, Loc(2, 17));
}

#[test]
fn newline_tracking() {
  let ts = tokens("a\n/* x */ b /* \n */ c d // e\nf", LexGoal::Div);
  let newlines: Vec<_> = ts.iter().map(|t| t.newline_before).collect();
  assert_eq!(newlines, [false, true, true, false, true]);
}

#[test]
fn regex_goal() {
  let ts = tokens("/a[/]b/gi", LexGoal::RegExp);
  assert_eq!(ts[0].kind, Regex);
  assert_eq!(ts[0].loc, Loc(0, 9));
  assert_kinds("a /= b", &[Ident, SlashEq, Ident]);
}

#[test]
fn template_tail_resumes_after_brace() {
  let mut lexer = Lexer::new("`a${x} b ${y}`");
  assert_eq!(lexer.next_token(LexGoal::Div).kind, TemplateChunk);
  assert_eq!(lexer.next_token(LexGoal::Div).kind, Ident);
  let chunk = lexer.next_token(LexGoal::TemplateTail);
  assert_eq!((chunk.kind, &lexer[chunk.loc]), (TemplateChunk, "} b ${"));
  assert_eq!(lexer.next_token(LexGoal::Div).kind, Ident);
  let end = lexer.next_token(LexGoal::TemplateTail);
  assert_eq!((end.kind, &lexer[end.loc]), (TemplateEnd, "}`"));
}
