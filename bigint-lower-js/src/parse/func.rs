use super::literal::normalise_identifier;
use super::Parser;
use crate::ast::stx::ClassMemberValue;
use crate::ast::stx::FuncBody;
use crate::ast::stx::FuncKind;
use crate::ast::stx::MethodKind;
use crate::ast::stx::ObjMember;
use crate::ast::stx::PropKey;
use crate::ast::stx::Syntax;
use crate::ast::NodeId;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::operator::precedence;
use crate::operator::OperatorName;
use crate::token::TokenKind;

/// A property key as parsed, plus its identifier name if it could also be a binding.
pub struct ParsedPropKey {
  pub loc: Loc,
  pub key: PropKey,
  pub ident: Option<String>,
}

// Tokens after `get`, `set`, `async` or `static` that make the word itself the key.
fn ends_key(kind: TokenKind) -> bool {
  matches!(
    kind,
    TokenKind::LParen | TokenKind::Comma | TokenKind::Colon | TokenKind::RBrace | TokenKind::Eq | TokenKind::Semicolon
  )
}

impl<'a> Parser<'a> {
  /// Parses `function [*] [name] (params) { body }`. `start` is where the function began,
  /// which differs from the `function` keyword when it is preceded by `async`.
  pub fn parse_function(&mut self, kind: FuncKind, async_: bool, start: Loc) -> SyntaxResult<NodeId> {
    self.parse_function_with_name(kind, async_, start, kind != FuncKind::Declaration)
  }

  pub fn parse_function_with_name(
    &mut self,
    kind: FuncKind,
    async_: bool,
    start: Loc,
    anonymous_ok: bool,
  ) -> SyntaxResult<NodeId> {
    self.expect(TokenKind::Function)?;
    let generator = self.eat(TokenKind::Star);
    let name = if self.peek().kind.is_identifier_like() || !anonymous_ok {
      let (loc, name) = self.expect_identifier()?;
      Some(self.alloc(loc, Syntax::IdPat { name }))
    } else {
      None
    };
    let params = self.parse_params()?;
    let body = self.parse_function_body()?;
    let end = self.prev_loc();
    Ok(self.alloc(start + end, Syntax::Function {
      kind,
      name,
      async_,
      generator,
      params,
      body: FuncBody::Block(body),
    }))
  }

  /// Parses a parenthesised parameter list.
  pub fn parse_params(&mut self) -> SyntaxResult<Vec<NodeId>> {
    self.expect(TokenKind::LParen)?;
    let mut params = Vec::new();
    loop {
      if self.eat(TokenKind::RParen) {
        return Ok(params);
      };
      let rest = self.eat(TokenKind::Ellipsis);
      let pattern = self.parse_pattern()?;
      let default_value = if !rest && self.eat(TokenKind::Eq) {
        Some(self.parse_assignment_expr(false)?)
      } else {
        None
      };
      let mut loc = self.loc_of(pattern);
      if let Some(default_value) = default_value {
        loc.extend(self.loc_of(default_value));
      };
      params.push(self.alloc(loc, Syntax::ParamDecl {
        rest,
        pattern,
        default_value,
      }));
      if rest {
        self.expect(TokenKind::RParen)?;
        return Ok(params);
      };
      if self.peek().kind != TokenKind::RParen {
        self.expect(TokenKind::Comma)?;
      };
    }
  }

  pub fn parse_function_body(&mut self) -> SyntaxResult<Vec<NodeId>> {
    self.expect(TokenKind::LBrace)?;
    let body = self.parse_stmts(TokenKind::RBrace)?;
    self.expect(TokenKind::RBrace)?;
    Ok(body)
  }

  fn parse_method_func(&mut self, start: Loc, async_: bool, generator: bool) -> SyntaxResult<NodeId> {
    let params = self.parse_params()?;
    let body = self.parse_function_body()?;
    let end = self.prev_loc();
    Ok(self.alloc(start + end, Syntax::Function {
      kind: FuncKind::Method,
      name: None,
      async_,
      generator,
      params,
      body: FuncBody::Block(body),
    }))
  }

  pub fn parse_prop_key(&mut self) -> SyntaxResult<ParsedPropKey> {
    if let Some(start) = self.eat_loc(TokenKind::LBracket) {
      let expr = self.parse_assignment_expr(false)?;
      let end = self.expect(TokenKind::RBracket)?.loc;
      return Ok(ParsedPropKey {
        loc: start + end,
        key: PropKey::Computed(expr),
        ident: None,
      });
    };
    let t = self.bump();
    let raw = self.string(t.loc);
    let ident = match t.kind {
      TokenKind::Str | TokenKind::Number => None,
      kind if kind.is_identifier_like() => Some(normalise_identifier(&raw)),
      kind if kind.is_keyword() => None,
      TokenKind::Invalid if raw.starts_with('#') => {
        return Err(t.error(SyntaxErrorKind::Unsupported("private member")))
      }
      _ => return Err(t.error(SyntaxErrorKind::Expected("property key"))),
    };
    Ok(ParsedPropKey {
      loc: t.loc,
      key: PropKey::Direct(raw),
      ident,
    })
  }

  fn parse_method_modifiers(&mut self) -> (bool, bool, MethodKind) {
    let (a, b) = self.peek_pair();
    let async_ = a.kind == TokenKind::Async && !ends_key(b.kind) && !b.newline_before;
    if async_ {
      self.bump();
    };
    let generator = self.eat(TokenKind::Star);
    let mut kind = MethodKind::Method;
    if !async_ && !generator {
      let (a, b) = self.peek_pair();
      if matches!(a.kind, TokenKind::Get | TokenKind::Set) && !ends_key(b.kind) {
        self.bump();
        kind = if a.kind == TokenKind::Get {
          MethodKind::Getter
        } else {
          MethodKind::Setter
        };
      };
    };
    (async_, generator, kind)
  }

  pub fn parse_lit_obj(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::LBrace)?.loc;
    let mut members = Vec::new();
    loop {
      if let Some(end) = self.eat_loc(TokenKind::RBrace) {
        return Ok(self.alloc(start + end, Syntax::LitObj { members }));
      };
      members.push(self.parse_obj_member()?);
      if self.peek().kind != TokenKind::RBrace {
        self.expect(TokenKind::Comma)?;
      };
    }
  }

  fn parse_obj_member(&mut self) -> SyntaxResult<NodeId> {
    let start = self.peek().loc;
    if self.eat(TokenKind::Ellipsis) {
      let value = self.parse_assignment_expr(false)?;
      let loc = start + self.loc_of(value);
      return Ok(self.alloc(loc, Syntax::ObjMember(ObjMember::Spread { value })));
    };
    let (async_, generator, kind) = self.parse_method_modifiers();
    let key = self.parse_prop_key()?;
    if async_ || generator || kind != MethodKind::Method || self.peek().kind == TokenKind::LParen {
      let func = self.parse_method_func(key.loc, async_, generator)?;
      let loc = start + self.loc_of(func);
      return Ok(self.alloc(loc, Syntax::ObjMember(ObjMember::Method {
        key: key.key,
        kind,
        func,
      })));
    };
    if self.eat(TokenKind::Colon) {
      let value = self.parse_assignment_expr(false)?;
      let loc = start + self.loc_of(value);
      return Ok(self.alloc(loc, Syntax::ObjMember(ObjMember::Prop {
        key: key.key,
        value,
      })));
    };
    let name = key
      .ident
      .ok_or_else(|| key.loc.error(SyntaxErrorKind::Expected("identifier"), None))?;
    if self.eat(TokenKind::Eq) {
      // Only valid once the literal turns out to be a destructuring target.
      let target = self.alloc(key.loc, Syntax::IdPat { name: name.clone() });
      let default_value = self.parse_assignment_expr(false)?;
      let loc = key.loc + self.loc_of(default_value);
      let value = self.alloc(loc, Syntax::Binary {
        operator: OperatorName::Assignment,
        left: target,
        right: default_value,
      });
      return Ok(self.alloc(loc, Syntax::ObjMember(ObjMember::Prop {
        key: PropKey::Direct(name),
        value,
      })));
    };
    let id = self.alloc(key.loc, Syntax::Id { name });
    Ok(self.alloc(key.loc, Syntax::ObjMember(ObjMember::Shorthand { name: id })))
  }

  /// Parses a class. Declarations need a name unless `anonymous_ok`, as in `export default class {}`.
  pub fn parse_class_with_name(&mut self, declaration: bool, anonymous_ok: bool) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Class)?.loc;
    let name = if self.peek().kind.is_identifier_like() || (declaration && !anonymous_ok) {
      let (loc, name) = self.expect_identifier()?;
      Some(self.alloc(loc, Syntax::IdPat { name }))
    } else {
      None
    };
    let extends = if self.eat(TokenKind::Extends) {
      Some(self.parse_expr_with_min_prec(precedence(OperatorName::Call), false)?)
    } else {
      None
    };
    self.expect(TokenKind::LBrace)?;
    let mut members = Vec::new();
    let end = loop {
      if let Some(end) = self.eat_loc(TokenKind::RBrace) {
        break end;
      };
      if self.eat(TokenKind::Semicolon) {
        continue;
      };
      members.push(self.parse_class_member()?);
    };
    Ok(self.alloc(start + end, Syntax::Class {
      declaration,
      name,
      extends,
      members,
    }))
  }

  pub fn parse_class(&mut self, declaration: bool) -> SyntaxResult<NodeId> {
    self.parse_class_with_name(declaration, !declaration)
  }

  fn parse_class_member(&mut self) -> SyntaxResult<NodeId> {
    let (a, b) = self.peek_pair();
    let static_ = a.kind == TokenKind::Static && !ends_key(b.kind);
    if static_ {
      self.bump();
      if self.peek().kind == TokenKind::LBrace {
        return Err(self.peek().error(SyntaxErrorKind::Unsupported("class static block")));
      };
    };
    let (async_, generator, kind) = self.parse_method_modifiers();
    let key = self.parse_prop_key()?;
    if async_ || generator || kind != MethodKind::Method || self.peek().kind == TokenKind::LParen {
      let func = self.parse_method_func(key.loc, async_, generator)?;
      let loc = a.loc + self.loc_of(func);
      return Ok(self.alloc(loc, Syntax::ClassMember {
        static_,
        key: key.key,
        value: ClassMemberValue::Method { kind, func },
      }));
    };
    let initializer = if self.eat(TokenKind::Eq) {
      Some(self.parse_assignment_expr(false)?)
    } else {
      None
    };
    self.require_semicolon()?;
    let loc = a.loc + self.prev_loc();
    Ok(self.alloc(loc, Syntax::ClassMember {
      static_,
      key: key.key,
      value: ClassMemberValue::Field { initializer },
    }))
  }
}
