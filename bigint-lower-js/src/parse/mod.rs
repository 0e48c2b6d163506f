//! Recursive descent parser producing an arena [`Ast`].
//!
//! Tokens are lexed lazily and kept in a lookahead buffer so the parser can backtrack with
//! [`Parser::mark`] and [`Parser::rewind`]. Each buffered token remembers the [`LexGoal`] it was
//! lexed under; asking for the same position under another goal relexes from there.

use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::LexGoal;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TokenKind;

pub mod expr;
pub mod func;
pub mod literal;
pub mod operator;
pub mod pat;
pub mod stmt;
#[cfg(test)]
mod tests;

/// A position to [`Parser::rewind`] to. Nodes allocated after it are discarded on rewind.
#[derive(Copy, Clone, Debug)]
pub struct ParserMark {
  cursor: usize,
  ast_len: usize,
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  lookahead: Vec<(Token, LexGoal)>,
  cursor: usize,
  ast: Ast,
}

impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
    Parser::with_ast(lexer, Ast::new())
  }

  /// Allocates into an existing tree, so parsed code can be spliced into it.
  pub fn with_ast(lexer: Lexer<'a>, ast: Ast) -> Parser<'a> {
    Parser {
      lexer,
      lookahead: Vec::new(),
      cursor: 0,
      ast,
    }
  }

  pub fn into_ast(self) -> Ast {
    self.ast
  }

  pub fn ast(&self) -> &Ast {
    &self.ast
  }

  pub fn ast_mut(&mut self) -> &mut Ast {
    &mut self.ast
  }

  pub fn alloc(&mut self, loc: Loc, stx: Syntax) -> NodeId {
    self.ast.alloc(loc, stx)
  }

  pub fn loc_of(&self, id: NodeId) -> Loc {
    self.ast.loc(id)
  }

  pub fn str(&self, loc: Loc) -> &str {
    &self.lexer[loc]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn mark(&self) -> ParserMark {
    ParserMark {
      cursor: self.cursor,
      ast_len: self.ast.len(),
    }
  }

  pub fn rewind(&mut self, mark: ParserMark) {
    self.cursor = mark.cursor;
    self.ast.truncate(mark.ast_len);
  }

  /// The token at the cursor, lexed under `goal`.
  fn current(&mut self, goal: LexGoal) -> Token {
    match self.lookahead.get(self.cursor) {
      Some(&(token, lexed_under)) if lexed_under == goal => return token,
      Some(_) => {
        self.lookahead.truncate(self.cursor);
        let resume = self.lookahead.last().map_or(0, |(t, _)| t.loc.1);
        self.lexer.seek(resume);
      }
      None => {}
    };
    let token = self.lexer.next_token(goal);
    self.lookahead.push((token, goal));
    token
  }

  pub fn peek_in(&mut self, goal: LexGoal) -> Token {
    self.current(goal)
  }

  pub fn peek(&mut self) -> Token {
    self.current(LexGoal::Div)
  }

  /// The next two tokens, both lexed with `/` as division.
  pub fn peek_pair(&mut self) -> (Token, Token) {
    let first = self.bump();
    let second = self.peek();
    self.cursor -= 1;
    (first, second)
  }

  pub fn bump_in(&mut self, goal: LexGoal) -> Token {
    let token = self.current(goal);
    self.cursor += 1;
    token
  }

  pub fn bump(&mut self) -> Token {
    self.bump_in(LexGoal::Div)
  }

  /// Location of the last consumed token.
  pub fn prev_loc(&self) -> Loc {
    match self.cursor {
      0 => Loc::default(),
      i => self.lookahead[i - 1].0.loc,
    }
  }

  pub fn eat_loc(&mut self, kind: TokenKind) -> Option<Loc> {
    let token = self.peek();
    if token.kind != kind {
      return None;
    }
    self.cursor += 1;
    Some(token.loc)
  }

  pub fn eat(&mut self, kind: TokenKind) -> bool {
    self.eat_loc(kind).is_some()
  }

  pub fn expect_in(&mut self, kind: TokenKind, goal: LexGoal) -> SyntaxResult<Token> {
    let token = self.bump_in(goal);
    match token.kind {
      k if k == kind => Ok(token),
      TokenKind::End => Err(token.error(SyntaxErrorKind::UnexpectedEnd)),
      _ => Err(token.error(SyntaxErrorKind::MissingToken(kind))),
    }
  }

  pub fn expect(&mut self, kind: TokenKind) -> SyntaxResult<Token> {
    self.expect_in(kind, LexGoal::Div)
  }

  pub fn expect_where(
    &mut self,
    pred: impl FnOnce(TokenKind) -> bool,
    what: &'static str,
  ) -> SyntaxResult<Token> {
    let token = self.bump();
    match token.kind {
      k if pred(k) => Ok(token),
      TokenKind::End => Err(token.error(SyntaxErrorKind::UnexpectedEnd)),
      _ => Err(token.error(SyntaxErrorKind::Expected(what))),
    }
  }

  /// An identifier or unreserved keyword, with escapes decoded.
  pub fn expect_identifier(&mut self) -> SyntaxResult<(Loc, String)> {
    let token = self.expect_where(TokenKind::is_identifier_like, "identifier")?;
    Ok((token.loc, literal::normalise_identifier(self.str(token.loc))))
  }

  /// A name after `.`, where every keyword is allowed.
  pub fn expect_property_name(&mut self) -> SyntaxResult<(Loc, String)> {
    let token = self.expect_where(|k| k == TokenKind::Ident || k.is_keyword(), "property name")?;
    Ok((token.loc, self.string(token.loc)))
  }

  /// Parses a whole unit and makes its top level the tree root.
  pub fn parse_top_level(&mut self) -> SyntaxResult<NodeId> {
    let body = self.parse_stmts(TokenKind::End)?;
    self.expect(TokenKind::End)?;
    let top = self.alloc(self.lexer.full_range(), Syntax::TopLevel { body });
    self.ast.set_root(top);
    Ok(top)
  }

  /// Statements up to, but not including, `end`.
  pub fn parse_stmts(&mut self, end: TokenKind) -> SyntaxResult<Vec<NodeId>> {
    let mut body = Vec::new();
    loop {
      let next = self.peek();
      match next.kind {
        k if k == end => return Ok(body),
        TokenKind::End => return Err(next.error(SyntaxErrorKind::UnexpectedEnd)),
        TokenKind::Invalid => return Err(next.error(SyntaxErrorKind::InvalidToken)),
        _ => body.push(self.parse_stmt()?),
      }
    }
  }
}
