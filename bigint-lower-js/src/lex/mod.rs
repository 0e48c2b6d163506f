//! Tokenizer.
//!
//! Whether `/` starts a regular expression, and whether `}` resumes a template, depends on the
//! surrounding syntax, so the parser names a [`LexGoal`] for every token it asks for.

use crate::char::is_id_continue;
use crate::char::is_id_start;
use crate::char::is_line_terminator;
use crate::char::is_whitespace;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TokenKind;
use crate::token::KEYWORDS;
use crate::token::PUNCTUATORS;
use ahash::HashMap;
use aho_corasick::AhoCorasick;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use memchr::memchr3;
use memchr::memmem;
use once_cell::sync::Lazy;
use std::ops::Index;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexGoal {
  /// `/` is division.
  Div,
  /// `/` starts a regular expression literal.
  RegExp,
  /// The next token continues a template after the `}` that closes a substitution.
  TemplateTail,
}

// Leftmost-longest, so `>>>=` wins over `>>` and `>`.
static PUNCTUATOR_MATCHER: Lazy<Option<AhoCorasick>> = Lazy::new(|| {
  AhoCorasick::builder()
    .match_kind(MatchKind::LeftmostLongest)
    .start_kind(StartKind::Anchored)
    .build(PUNCTUATORS.iter().map(|&(text, _)| text))
    .ok()
});

static KEYWORD_LOOKUP: Lazy<HashMap<&'static str, TokenKind>> =
  Lazy::new(|| KEYWORDS.iter().copied().collect());

pub struct Lexer<'a> {
  source: &'a str,
  offset: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(source: &'a str) -> Lexer<'a> {
    Lexer { source, offset: 0 }
  }

  pub fn offset(&self) -> usize {
    self.offset
  }

  /// Moves to `offset`, which must be the end of a token this lexer produced (or zero).
  pub fn seek(&mut self, offset: usize) {
    self.offset = offset;
  }

  pub fn full_range(&self) -> Loc {
    Loc(0, self.source.len())
  }

  fn rest(&self) -> &'a str {
    &self.source[self.offset..]
  }

  fn peek_char(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn bump_char(&mut self) {
    if let Some(c) = self.peek_char() {
      self.offset += c.len_utf8();
    }
  }

  fn eat_char(&mut self, c: char) -> bool {
    let matched = self.rest().starts_with(c);
    if matched {
      self.offset += c.len_utf8();
    }
    matched
  }

  fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
    let rest = self.rest();
    self.offset += rest.find(|c| !pred(c)).unwrap_or(rest.len());
  }

  pub fn next_token(&mut self, goal: LexGoal) -> Token {
    let newline_before = match self.skip_trivia() {
      Ok(newline) => newline,
      Err(comment_start) => {
        return Token {
          kind: TokenKind::Invalid,
          loc: Loc(comment_start, self.offset),
          newline_before: false,
        }
      }
    };
    let start = self.offset;
    let kind = match self.peek_char() {
      None => TokenKind::End,
      Some('}') if goal == LexGoal::TemplateTail => {
        self.offset += 1;
        self.template_text()
      }
      Some(c) => self.token(c, goal),
    };
    Token {
      kind,
      loc: Loc(start, self.offset),
      newline_before,
    }
  }

  /// Skips whitespace and comments and reports whether a line terminator was among them. An
  /// unterminated block comment moves to the end of the source and returns its start.
  fn skip_trivia(&mut self) -> Result<bool, usize> {
    let mut newline = false;
    loop {
      let rest = self.rest();
      if rest.starts_with("//") {
        // The terminator itself is seen on the next iteration.
        self.offset += rest.find(is_line_terminator).unwrap_or(rest.len());
      } else if rest.starts_with("/*") {
        let body = &rest[2..];
        let Some(len) = memmem::find(body.as_bytes(), b"*/") else {
          let start = self.offset;
          self.offset = self.source.len();
          return Err(start);
        };
        newline |= body[..len].contains(is_line_terminator);
        self.offset += len + 4;
      } else {
        match self.peek_char() {
          Some(c) if is_line_terminator(c) => {
            newline = true;
            self.offset += c.len_utf8();
          }
          Some(c) if is_whitespace(c) => self.offset += c.len_utf8(),
          _ => return Ok(newline),
        };
      }
    }
  }

  fn token(&mut self, first: char, goal: LexGoal) -> TokenKind {
    match first {
      '0'..='9' => self.numeric(),
      '.' if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => self.numeric(),
      '"' | '\'' => self.string(first),
      '`' => {
        self.offset += 1;
        self.template_text()
      }
      '/' if goal == LexGoal::RegExp => self.regex(),
      c if is_id_start(c) || c == '\\' => self.identifier(),
      _ => self.punctuator(),
    }
  }

  fn punctuator(&mut self) -> TokenKind {
    let rest = self.rest();
    let found = PUNCTUATOR_MATCHER
      .as_ref()
      .and_then(|matcher| matcher.find(Input::new(rest).anchored(Anchored::Yes)));
    let Some(found) = found else {
      self.bump_char();
      return TokenKind::Invalid;
    };
    let (_, mut kind) = PUNCTUATORS[found.pattern().as_usize()];
    let mut len = found.end();
    // `a?.5:b` is a conditional.
    if kind == TokenKind::OptDot && rest[len..].starts_with(|c: char| c.is_ascii_digit()) {
      kind = TokenKind::Question;
      len = 1;
    }
    self.offset += len;
    kind
  }

  fn identifier(&mut self) -> TokenKind {
    let start = self.offset;
    let mut escaped = false;
    while let Some(c) = self.peek_char() {
      if c == '\\' {
        escaped = true;
        if !self.unicode_escape() {
          self.bump_char();
          return TokenKind::Invalid;
        }
      } else if is_id_continue(c) {
        self.offset += c.len_utf8();
      } else {
        break;
      }
    }
    // An escaped keyword is an ordinary identifier.
    if escaped {
      return TokenKind::Ident;
    }
    KEYWORD_LOOKUP
      .get(&self.source[start..self.offset])
      .copied()
      .unwrap_or(TokenKind::Ident)
  }

  /// Consumes `\uXXXX` or `\u{X...}`.
  fn unicode_escape(&mut self) -> bool {
    let rest = self.rest();
    let len = if let Some(braced) = rest.strip_prefix("\\u{") {
      match braced.find('}') {
        Some(close) if close > 0 && braced[..close].bytes().all(|b| b.is_ascii_hexdigit()) => close + 4,
        _ => return false,
      }
    } else if let Some(hex) = rest.strip_prefix("\\u") {
      if hex.len() < 4 || !hex.as_bytes()[..4].iter().all(u8::is_ascii_hexdigit) {
        return false;
      }
      6
    } else {
      return false;
    };
    self.offset += len;
    true
  }

  /// Numeric separators and digits are left for the parser to validate.
  fn numeric(&mut self) -> TokenKind {
    let bytes = self.rest().as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && matches!(bytes[1] | 0x20, b'x' | b'o' | b'b') {
      self.offset += 2;
      self.skip_while(|c| c.is_ascii_hexdigit() || c == '_');
      return if self.eat_char('n') {
        TokenKind::BigInt
      } else {
        TokenKind::Number
      };
    }
    let decimal = |c: char| c.is_ascii_digit() || c == '_';
    let integer = bytes[0] != b'.';
    self.skip_while(decimal);
    if integer && self.eat_char('n') {
      return TokenKind::BigInt;
    }
    if self.eat_char('.') {
      self.skip_while(decimal);
    }
    if self.eat_char('e') || self.eat_char('E') {
      if !self.eat_char('+') {
        self.eat_char('-');
      }
      self.skip_while(decimal);
    }
    TokenKind::Number
  }

  fn string(&mut self, quote: char) -> TokenKind {
    self.offset += 1;
    loop {
      let Some(c) = self.peek_char() else {
        return TokenKind::Invalid;
      };
      self.offset += c.len_utf8();
      match c {
        '\\' => {
          // Escaped line terminators are line continuations.
          if self.peek_char() == Some('\r') {
            self.offset += 1;
            self.eat_char('\n');
          } else {
            self.bump_char();
          }
        }
        '\n' | '\r' => return TokenKind::Invalid,
        c if c == quote => return TokenKind::Str,
        _ => {}
      };
    }
  }

  /// Template text after a backtick or a closing `}`.
  fn template_text(&mut self) -> TokenKind {
    loop {
      let bytes = self.rest().as_bytes();
      let Some(i) = memchr3(b'\\', b'`', b'$', bytes) else {
        self.offset = self.source.len();
        return TokenKind::Invalid;
      };
      let found = bytes[i];
      self.offset += i + 1;
      match found {
        b'`' => return TokenKind::TemplateEnd,
        b'$' => {
          if self.eat_char('{') {
            return TokenKind::TemplateChunk;
          }
        }
        _ => self.bump_char(),
      };
    }
  }

  fn regex(&mut self) -> TokenKind {
    self.offset += 1;
    let mut in_class = false;
    loop {
      let Some(c) = self.peek_char() else {
        return TokenKind::Invalid;
      };
      if is_line_terminator(c) {
        return TokenKind::Invalid;
      }
      self.offset += c.len_utf8();
      match c {
        '\\' => match self.peek_char() {
          Some(escaped) if !is_line_terminator(escaped) => self.offset += escaped.len_utf8(),
          _ => return TokenKind::Invalid,
        },
        '[' => in_class = true,
        ']' => in_class = false,
        '/' if !in_class => break,
        _ => {}
      };
    }
    // Flags.
    self.skip_while(is_id_continue);
    TokenKind::Regex
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, loc: Loc) -> &str {
    &self.source[loc.0..loc.1]
  }
}
