use super::literal::normalise_identifier;
use super::literal::normalise_literal_bigint;
use super::literal::normalise_literal_number;
use super::literal::normalise_literal_string;
use super::operator::infix_operator;
use super::operator::prefix_operator;
use super::Parser;
use crate::ast::stx::ArrElem;
use crate::ast::stx::CallArg;
use crate::ast::stx::FuncBody;
use crate::ast::stx::FuncKind;
use crate::ast::stx::Syntax;
use crate::ast::stx::TemplatePart;
use crate::ast::NodeId;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::LexGoal;
use crate::loc::Loc;
use crate::operator::precedence;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::token::Token;
use crate::token::TokenKind;

pub fn assignment_prec() -> u8 {
  precedence(OperatorName::Assignment)
}

impl<'a> Parser<'a> {
  /// Parses a full expression, including the comma operator.
  pub fn parse_expr(&mut self) -> SyntaxResult<NodeId> {
    self.parse_expr_with_min_prec(1, false)
  }

  /// Parses an expression that cannot contain a top-level `in`, as in a `for` head.
  pub fn parse_expr_no_in(&mut self) -> SyntaxResult<NodeId> {
    self.parse_expr_with_min_prec(1, true)
  }

  /// Parses an expression without a top-level comma, e.g. a call argument.
  pub fn parse_assignment_expr(&mut self, no_in: bool) -> SyntaxResult<NodeId> {
    self.parse_expr_with_min_prec(assignment_prec(), no_in)
  }

  pub fn parse_expr_with_min_prec(&mut self, min_prec: u8, no_in: bool) -> SyntaxResult<NodeId> {
    let mut left = self.parse_expr_operand(no_in)?;
    loop {
      let t = self.peek();

      if matches!(t.kind, TokenKind::PlusPlus | TokenKind::MinusMinus) {
        // A line break before `++` ends the statement.
        if t.newline_before {
          break;
        };
        let operator = if t.kind == TokenKind::PlusPlus {
          OperatorName::PostfixIncrement
        } else {
          OperatorName::PostfixDecrement
        };
        if precedence(operator) < min_prec {
          break;
        };
        self.bump();
        self.check_update_target(left)?;
        let loc = self.loc_of(left) + t.loc;
        left = self.alloc(loc, Syntax::UnaryPostfix {
          operator,
          argument: left,
        });
        continue;
      };

      if matches!(
        t.kind,
        TokenKind::TemplateChunk | TokenKind::TemplateEnd
      ) {
        if precedence(OperatorName::Call) < min_prec {
          break;
        };
        self.bump();
        let (parts, end) = self.parse_template_parts(&t)?;
        let loc = self.loc_of(left) + end;
        left = self.alloc(loc, Syntax::TaggedTemplate {
          function: left,
          parts,
        });
        continue;
      };

      let Some(operator) = infix_operator(t.kind) else {
        break;
      };
      if no_in && operator.name == OperatorName::In {
        break;
      };
      if operator.precedence < min_prec {
        break;
      };
      self.bump();
      let start = self.loc_of(left);
      left = match operator.name {
        OperatorName::Call | OperatorName::OptionalChainingCall => {
          let (arguments, end) = self.parse_call_args()?;
          self.alloc(start + end, Syntax::Call {
            optional_chaining: operator.name == OperatorName::OptionalChainingCall,
            callee: left,
            arguments,
          })
        }
        OperatorName::MemberAccess | OperatorName::OptionalChainingMemberAccess => {
          let (end, right) = self.expect_property_name()?;
          self.alloc(start + end, Syntax::Member {
            optional_chaining: operator.name == OperatorName::OptionalChainingMemberAccess,
            left,
            right,
          })
        }
        OperatorName::ComputedMemberAccess
        | OperatorName::OptionalChainingComputedMemberAccess => {
          let member = self.parse_expr()?;
          let end = self.expect(TokenKind::RBracket)?.loc;
          self.alloc(start + end, Syntax::ComputedMember {
            optional_chaining: operator.name
              == OperatorName::OptionalChainingComputedMemberAccess,
            object: left,
            member,
          })
        }
        OperatorName::Conditional => {
          let consequent = self.parse_assignment_expr(false)?;
          self.expect(TokenKind::Colon)?;
          let alternate = self.parse_assignment_expr(no_in)?;
          let end = self.loc_of(alternate);
          self.alloc(start + end, Syntax::Cond {
            test: left,
            consequent,
            alternate,
          })
        }
        name => {
          if name.is_assignment() {
            self.to_assignment_target(left, name)?;
          };
          let next_min_prec = match operator.associativity {
            Associativity::Left => operator.precedence + 1,
            Associativity::Right => operator.precedence,
          };
          let right = self.parse_expr_with_min_prec(next_min_prec, no_in)?;
          let end = self.loc_of(right);
          self.alloc(start + end, Syntax::Binary {
            operator: name,
            left,
            right,
          })
        }
      };
    }
    Ok(left)
  }

  fn parse_expr_operand(&mut self, no_in: bool) -> SyntaxResult<NodeId> {
    let t = self.peek_in(LexGoal::RegExp);
    if t.kind == TokenKind::Regex {
      self.bump_in(LexGoal::RegExp);
      return Ok(self.alloc(t.loc, Syntax::LitRegex {
        value: self.string(t.loc),
      }));
    };

    if let Some(arrow) = self.try_parse_arrow_function(no_in)? {
      return Ok(arrow);
    };

    if t.kind == TokenKind::New {
      return self.parse_new();
    };

    if let Some(operator) = prefix_operator(t.kind) {
      self.bump_in(LexGoal::RegExp);
      if operator.name == OperatorName::Yield {
        return self.parse_yield(t.loc, no_in);
      };
      let argument = self.parse_expr_with_min_prec(operator.precedence, no_in)?;
      let update = matches!(
        operator.name,
        OperatorName::PrefixIncrement | OperatorName::PrefixDecrement
      );
      if update {
        self.check_update_target(argument)?;
      };
      // `-a ** b` is ambiguous and must be parenthesized; `++a ** b` is not.
      let next = self.peek();
      if !update && next.kind == TokenKind::StarStar {
        return Err(next.error(SyntaxErrorKind::UnaryBeforeExponentiation));
      };
      let loc = t.loc + self.loc_of(argument);
      return Ok(self.alloc(loc, Syntax::Unary {
        operator: operator.name,
        argument,
      }));
    };

    self.parse_expr_primary()
  }

  fn parse_yield(&mut self, start: Loc, no_in: bool) -> SyntaxResult<NodeId> {
    let delegated = self.eat(TokenKind::Star);
    let next = self.peek_in(LexGoal::RegExp);
    let has_argument = delegated
      || !(next.newline_before
        || matches!(
          next.kind,
          TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::RBrace
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::End
        ));
    let argument = if has_argument {
      self.parse_assignment_expr(no_in)?
    } else {
      self.alloc(start, Syntax::Id {
        name: "undefined".into(),
      })
    };
    let operator = if delegated {
      OperatorName::YieldDelegated
    } else {
      OperatorName::Yield
    };
    let loc = start + self.loc_of(argument);
    Ok(self.alloc(loc, Syntax::Unary { operator, argument }))
  }

  fn parse_new(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::New)?.loc;
    if self.peek().kind == TokenKind::Dot {
      return Err(self.peek().error(SyntaxErrorKind::Unsupported("new.target")));
    };
    let mut callee = if self.peek().kind == TokenKind::New {
      self.parse_new()?
    } else {
      self.parse_expr_primary()?
    };
    // Member accesses bind to the callee; the first call's arguments belong to `new`.
    loop {
      let t = self.peek();
      callee = match t.kind {
        TokenKind::Dot => {
          self.bump();
          let (end, right) = self.expect_property_name()?;
          let loc = self.loc_of(callee) + end;
          self.alloc(loc, Syntax::Member {
            optional_chaining: false,
            left: callee,
            right,
          })
        }
        TokenKind::LBracket => {
          self.bump();
          let member = self.parse_expr()?;
          let end = self.expect(TokenKind::RBracket)?.loc;
          let loc = self.loc_of(callee) + end;
          self.alloc(loc, Syntax::ComputedMember {
            optional_chaining: false,
            object: callee,
            member,
          })
        }
        _ => break,
      };
    }
    let (arguments, end) = if self.eat(TokenKind::LParen) {
      self.parse_call_args()?
    } else {
      (Vec::new(), self.loc_of(callee))
    };
    Ok(self.alloc(start + end, Syntax::New { callee, arguments }))
  }

  /// Parses arguments after the opening parenthesis, through the closing one.
  pub fn parse_call_args(&mut self) -> SyntaxResult<(Vec<CallArg>, Loc)> {
    let mut arguments = Vec::new();
    loop {
      if let Some(end) = self.eat_loc(TokenKind::RParen) {
        return Ok((arguments, end));
      };
      let spread = self.eat(TokenKind::Ellipsis);
      let value = self.parse_assignment_expr(false)?;
      arguments.push(CallArg { spread, value });
      if self.peek().kind != TokenKind::RParen {
        self.expect(TokenKind::Comma)?;
      };
    }
  }

  /// Parses the remaining parts of a template whose first token `first` was just consumed.
  pub fn parse_template_parts(&mut self, first: &Token) -> SyntaxResult<(Vec<TemplatePart>, Loc)> {
    let mut parts = Vec::new();
    let mut token = first.clone();
    // The first token starts after a backtick, later ones after the `}` closing a substitution.
    let mut prefix = self.str(token.loc).find('`').map(|p| p + 1).unwrap_or(0);
    loop {
      let raw = self.str(token.loc);
      let ended = token.kind == TokenKind::TemplateEnd;
      let suffix = if ended { 1 } else { 2 };
      let text = raw
        .get(prefix..raw.len().saturating_sub(suffix))
        .ok_or_else(|| token.error(SyntaxErrorKind::Expected("template literal")))?;
      parts.push(TemplatePart::String(text.to_string()));
      if ended {
        return Ok((parts, token.loc));
      };
      parts.push(TemplatePart::Substitution(self.parse_expr()?));
      token = self.bump_in(LexGoal::TemplateTail);
      if !matches!(
        token.kind,
        TokenKind::TemplateChunk | TokenKind::TemplateEnd
      ) {
        return Err(token.error(SyntaxErrorKind::Expected("template continuation")));
      };
      prefix = match self.str(token.loc).find('}') {
        Some(p) => p + 1,
        None => return Err(token.error(SyntaxErrorKind::MissingToken(TokenKind::RBrace))),
      };
    }
  }

  fn parse_expr_primary(&mut self) -> SyntaxResult<NodeId> {
    let t = self.peek_in(LexGoal::RegExp);
    if t.kind == TokenKind::Async {
      let (_, next) = self.peek_pair();
      if next.kind == TokenKind::Function && !next.newline_before {
        self.bump();
        return self.parse_function(FuncKind::Expression, true, t.loc);
      };
    };
    if t.kind.is_identifier_like() {
      self.bump();
      return Ok(self.alloc(t.loc, Syntax::Id {
        name: normalise_identifier(self.str(t.loc)),
      }));
    };
    match t.kind {
      TokenKind::TemplateChunk | TokenKind::TemplateEnd => {
        self.bump();
        let (parts, end) = self.parse_template_parts(&t)?;
        Ok(self.alloc(t.loc + end, Syntax::LitTemplate { parts }))
      }
      TokenKind::LBracket => self.parse_lit_arr(),
      TokenKind::LBrace => self.parse_lit_obj(),
      TokenKind::Function => self.parse_function(FuncKind::Expression, false, t.loc),
      TokenKind::Class => self.parse_class(false),
      TokenKind::LParen => {
        self.bump();
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(expr)
      }
      TokenKind::Import => Err(t.error(SyntaxErrorKind::Unsupported("dynamic import"))),
      _ => {
        self.bump();
        let stx = match t.kind {
          TokenKind::This => Syntax::This,
          TokenKind::Super => Syntax::Super,
          TokenKind::True => Syntax::LitBool { value: true },
          TokenKind::False => Syntax::LitBool { value: false },
          TokenKind::Null => Syntax::LitNull,
          TokenKind::Number => Syntax::LitNum {
            value: normalise_literal_number(t.loc, self.str(t.loc))?,
          },
          TokenKind::BigInt => Syntax::LitBigInt {
            value: normalise_literal_bigint(t.loc, self.str(t.loc))?,
          },
          TokenKind::Str => Syntax::LitStr {
            value: normalise_literal_string(self.str(t.loc)),
          },
          TokenKind::End => return Err(t.error(SyntaxErrorKind::UnexpectedEnd)),
          TokenKind::Invalid => return Err(t.error(SyntaxErrorKind::InvalidToken)),
          _ => return Err(t.error(SyntaxErrorKind::Expected("expression operand"))),
        };
        Ok(self.alloc(t.loc, stx))
      }
    }
  }

  fn parse_lit_arr(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::LBracket)?.loc;
    let mut elements = Vec::new();
    loop {
      if let Some(end) = self.eat_loc(TokenKind::RBracket) {
        return Ok(self.alloc(start + end, Syntax::LitArr { elements }));
      };
      if self.eat(TokenKind::Comma) {
        elements.push(ArrElem::Empty);
        continue;
      };
      if self.eat(TokenKind::Ellipsis) {
        elements.push(ArrElem::Spread(self.parse_assignment_expr(false)?));
      } else {
        elements.push(ArrElem::Single(self.parse_assignment_expr(false)?));
      };
      if self.peek().kind != TokenKind::RBracket {
        self.expect(TokenKind::Comma)?;
      };
    }
  }

  fn try_parse_arrow_function(&mut self, no_in: bool) -> SyntaxResult<Option<NodeId>> {
    let (a, b) = self.peek_pair();
    let plausible = a.kind == TokenKind::LParen
      || (a.kind.is_identifier_like() && b.kind == TokenKind::Arrow)
      || (a.kind == TokenKind::Async
        && !b.newline_before
        && (b.kind == TokenKind::LParen || b.kind.is_identifier_like()));
    if !plausible {
      return Ok(None);
    };
    let cp = self.mark();
    let head = self.parse_arrow_function_head();
    let arrow = self.peek();
    let (async_, params) = match head {
      Ok(head) if arrow.kind == TokenKind::Arrow => head,
      _ => {
        self.rewind(cp);
        return Ok(None);
      }
    };
    if arrow.newline_before {
      return Err(arrow.error(SyntaxErrorKind::NewlineBeforeArrow));
    };
    self.bump();
    let body = if self.peek().kind == TokenKind::LBrace {
      FuncBody::Block(self.parse_function_body()?)
    } else {
      FuncBody::Expression(self.parse_assignment_expr(no_in)?)
    };
    let end = match &body {
      FuncBody::Expression(expr) => self.loc_of(*expr),
      FuncBody::Block(_) => self.prev_loc(),
    };
    Ok(Some(self.alloc(a.loc + end, Syntax::Function {
      kind: FuncKind::Arrow,
      name: None,
      async_,
      generator: false,
      params,
      body,
    })))
  }

  fn parse_arrow_function_head(&mut self) -> SyntaxResult<(bool, Vec<NodeId>)> {
    let (a, b) = self.peek_pair();
    let async_ = a.kind == TokenKind::Async && b.kind != TokenKind::Arrow;
    if async_ {
      self.bump();
    };
    if self.peek().kind == TokenKind::LParen {
      return Ok((async_, self.parse_params()?));
    };
    let (loc, name) = self.expect_identifier()?;
    let pattern = self.alloc(loc, Syntax::IdPat { name });
    let param = self.alloc(loc, Syntax::ParamDecl {
      rest: false,
      pattern,
      default_value: None,
    });
    Ok((async_, vec![param]))
  }

  fn check_update_target(&self, target: NodeId) -> SyntaxResult<()> {
    match self.ast().stx(target) {
      Syntax::Id { .. } | Syntax::Member { .. } | Syntax::ComputedMember { .. } => Ok(()),
      _ => Err(
        self
          .loc_of(target)
          .error(SyntaxErrorKind::InvalidAssignmentTarget, None),
      ),
    }
  }
}
