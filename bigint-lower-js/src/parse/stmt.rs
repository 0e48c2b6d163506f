use super::literal::normalise_literal_string;
use super::Parser;
use crate::ast::stx::ExportName;
use crate::ast::stx::FuncKind;
use crate::ast::stx::ImportName;
use crate::ast::stx::Syntax;
use crate::ast::stx::VarDeclMode;
use crate::ast::NodeId;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::operator::OperatorName;
use crate::token::Token;
use crate::token::TokenKind;

fn starts_let_declaration(next: &Token) -> bool {
  matches!(next.kind, TokenKind::LBracket | TokenKind::LBrace) || next.kind.is_identifier_like()
}

impl<'a> Parser<'a> {
  /// Consumes a `;`, or accepts an automatically inserted one before `}`, at the end of input,
  /// or after a line break.
  pub fn require_semicolon(&mut self) -> SyntaxResult<()> {
    let t = self.peek();
    if t.kind == TokenKind::Semicolon {
      self.bump();
      return Ok(());
    };
    if matches!(t.kind, TokenKind::RBrace | TokenKind::End) || t.newline_before {
      return Ok(());
    };
    Err(t.error(SyntaxErrorKind::MissingToken(TokenKind::Semicolon)))
  }

  pub fn parse_stmt(&mut self) -> SyntaxResult<NodeId> {
    let (a, b) = self.peek_pair();
    match a.kind {
      TokenKind::LBrace => self.parse_block(),
      TokenKind::Var | TokenKind::Const => self.parse_var_stmt(),
      TokenKind::Let if starts_let_declaration(&b) => self.parse_var_stmt(),
      TokenKind::Function => self.parse_function(FuncKind::Declaration, false, a.loc),
      TokenKind::Async if b.kind == TokenKind::Function && !b.newline_before => {
        self.bump();
        self.parse_function(FuncKind::Declaration, true, a.loc)
      }
      TokenKind::Class => self.parse_class(true),
      TokenKind::If => self.parse_if(),
      TokenKind::For => self.parse_for(),
      TokenKind::While => self.parse_while(),
      TokenKind::Do => self.parse_do_while(),
      TokenKind::Return => self.parse_return(),
      TokenKind::Throw => self.parse_throw(),
      TokenKind::Try => self.parse_try(),
      TokenKind::Switch => self.parse_switch(),
      TokenKind::Break | TokenKind::Continue => self.parse_break_or_continue(),
      TokenKind::Debugger => {
        self.bump();
        self.require_semicolon()?;
        Ok(self.alloc(a.loc, Syntax::Debugger))
      }
      TokenKind::Semicolon => {
        self.bump();
        Ok(self.alloc(a.loc, Syntax::Empty))
      }
      TokenKind::Import if !matches!(b.kind, TokenKind::LParen | TokenKind::Dot) => self.parse_import(),
      TokenKind::Export => self.parse_export(),
      TokenKind::With => Err(a.error(SyntaxErrorKind::Unsupported("with statement"))),
      kind if kind.is_identifier_like() && b.kind == TokenKind::Colon => {
        let (_, name) = self.expect_identifier()?;
        self.bump();
        let statement = self.parse_stmt()?;
        let loc = a.loc + self.loc_of(statement);
        Ok(self.alloc(loc, Syntax::Label { name, statement }))
      }
      _ => self.parse_expr_stmt(),
    }
  }

  fn parse_expr_stmt(&mut self) -> SyntaxResult<NodeId> {
    let expression = self.parse_expr()?;
    self.require_semicolon()?;
    let loc = self.loc_of(expression);
    Ok(self.alloc(loc, Syntax::ExprStmt { expression }))
  }

  pub fn parse_block(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::LBrace)?.loc;
    let body = self.parse_stmts(TokenKind::RBrace)?;
    let end = self.expect(TokenKind::RBrace)?.loc;
    Ok(self.alloc(start + end, Syntax::Block { body }))
  }

  fn parse_var_stmt(&mut self) -> SyntaxResult<NodeId> {
    let decl = self.parse_var_decl(false)?;
    self.require_semicolon()?;
    Ok(decl)
  }

  /// Parses `var|let|const` and its declarators, without the terminating semicolon.
  pub fn parse_var_decl(&mut self, no_in: bool) -> SyntaxResult<NodeId> {
    let t = self.bump();
    let mode = match t.kind {
      TokenKind::Var => VarDeclMode::Var,
      TokenKind::Let => VarDeclMode::Let,
      TokenKind::Const => VarDeclMode::Const,
      _ => return Err(t.error(SyntaxErrorKind::Expected("variable declaration"))),
    };
    let mut declarators = Vec::new();
    loop {
      let pattern = self.parse_pattern()?;
      let initializer = if self.eat(TokenKind::Eq) {
        Some(self.parse_assignment_expr(no_in)?)
      } else {
        None
      };
      let mut loc = self.loc_of(pattern);
      if let Some(initializer) = initializer {
        loc.extend(self.loc_of(initializer));
      };
      declarators.push(self.alloc(loc, Syntax::VarDeclarator {
        pattern,
        initializer,
      }));
      if !self.eat(TokenKind::Comma) {
        break;
      };
    }
    let loc = t.loc + self.prev_loc();
    Ok(self.alloc(loc, Syntax::VarDecl { mode, declarators }))
  }

  fn parse_paren_expr(&mut self) -> SyntaxResult<NodeId> {
    self.expect(TokenKind::LParen)?;
    let expr = self.parse_expr()?;
    self.expect(TokenKind::RParen)?;
    Ok(expr)
  }

  fn parse_if(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::If)?.loc;
    let test = self.parse_paren_expr()?;
    let consequent = self.parse_stmt()?;
    let alternate = if self.eat(TokenKind::Else) {
      Some(self.parse_stmt()?)
    } else {
      None
    };
    let end = self.loc_of(alternate.unwrap_or(consequent));
    Ok(self.alloc(start + end, Syntax::If {
      test,
      consequent,
      alternate,
    }))
  }

  fn parse_for(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::For)?.loc;
    let await_ = self.eat(TokenKind::Await);
    self.expect(TokenKind::LParen)?;
    let (a, b) = self.peek_pair();
    let init = match a.kind {
      TokenKind::Semicolon => None,
      TokenKind::Var | TokenKind::Const => Some(self.parse_var_decl(true)?),
      TokenKind::Let if starts_let_declaration(&b) => Some(self.parse_var_decl(true)?),
      _ => Some(self.parse_expr_no_in()?),
    };
    let t = self.peek();
    match init {
      Some(lhs) if matches!(t.kind, TokenKind::Of | TokenKind::In) => {
        self.bump();
        let of = t.kind == TokenKind::Of;
        if !matches!(self.ast().stx(lhs), Syntax::VarDecl { .. }) {
          self.to_assignment_target(lhs, OperatorName::Assignment)?;
        };
        let rhs = if of {
          self.parse_assignment_expr(false)?
        } else {
          self.parse_expr()?
        };
        self.expect(TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        let loc = start + self.loc_of(body);
        Ok(self.alloc(loc, Syntax::ForInOf {
          of,
          await_,
          lhs,
          rhs,
          body,
        }))
      }
      _ => {
        self.expect(TokenKind::Semicolon)?;
        let condition = if self.peek().kind == TokenKind::Semicolon {
          None
        } else {
          Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let post = if self.peek().kind == TokenKind::RParen {
          None
        } else {
          Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        let loc = start + self.loc_of(body);
        Ok(self.alloc(loc, Syntax::ForTriple {
          init,
          condition,
          post,
          body,
        }))
      }
    }
  }

  fn parse_while(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::While)?.loc;
    let condition = self.parse_paren_expr()?;
    let body = self.parse_stmt()?;
    let loc = start + self.loc_of(body);
    Ok(self.alloc(loc, Syntax::While { condition, body }))
  }

  fn parse_do_while(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Do)?.loc;
    let body = self.parse_stmt()?;
    self.expect(TokenKind::While)?;
    let condition = self.parse_paren_expr()?;
    // The semicolon after `do ... while (...)` is always optional.
    self.eat(TokenKind::Semicolon);
    let loc = start + self.prev_loc();
    Ok(self.alloc(loc, Syntax::DoWhile { condition, body }))
  }

  fn parse_return(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Return)?.loc;
    let next = self.peek();
    let value = if next.newline_before
      || matches!(next.kind, TokenKind::Semicolon | TokenKind::RBrace | TokenKind::End)
    {
      None
    } else {
      Some(self.parse_expr()?)
    };
    self.require_semicolon()?;
    let loc = start + self.prev_loc();
    Ok(self.alloc(loc, Syntax::Return { value }))
  }

  fn parse_throw(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Throw)?.loc;
    let next = self.peek();
    if next.newline_before {
      return Err(next.error(SyntaxErrorKind::NewlineAfterThrow));
    };
    let value = self.parse_expr()?;
    self.require_semicolon()?;
    let loc = start + self.loc_of(value);
    Ok(self.alloc(loc, Syntax::Throw { value }))
  }

  fn parse_try(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Try)?.loc;
    let wrapped = self.parse_block()?;
    let catch = if let Some(catch_start) = self.eat_loc(TokenKind::Catch) {
      let parameter = if self.eat(TokenKind::LParen) {
        let pattern = self.parse_pattern()?;
        self.expect(TokenKind::RParen)?;
        Some(pattern)
      } else {
        None
      };
      let body = self.parse_block()?;
      let loc = catch_start + self.loc_of(body);
      Some(self.alloc(loc, Syntax::CatchBlock { parameter, body }))
    } else {
      None
    };
    let finally = if self.eat(TokenKind::Finally) {
      Some(self.parse_block()?)
    } else {
      None
    };
    if catch.is_none() && finally.is_none() {
      return Err(start.error(SyntaxErrorKind::TryWithoutHandler, None));
    };
    let loc = start + self.prev_loc();
    Ok(self.alloc(loc, Syntax::Try {
      wrapped,
      catch,
      finally,
    }))
  }

  fn parse_switch(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Switch)?.loc;
    let test = self.parse_paren_expr()?;
    self.expect(TokenKind::LBrace)?;
    let mut branches = Vec::new();
    let end = loop {
      if let Some(end) = self.eat_loc(TokenKind::RBrace) {
        break end;
      };
      let t = self.bump();
      let case = match t.kind {
        TokenKind::Case => Some(self.parse_expr()?),
        TokenKind::Default => None,
        _ => return Err(t.error(SyntaxErrorKind::Expected("case or default"))),
      };
      self.expect(TokenKind::Colon)?;
      let mut body = Vec::new();
      while !matches!(
        self.peek().kind,
        TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::End
      ) {
        body.push(self.parse_stmt()?);
      }
      let loc = t.loc + self.prev_loc();
      branches.push(self.alloc(loc, Syntax::SwitchBranch { case, body }));
    };
    Ok(self.alloc(start + end, Syntax::Switch { test, branches }))
  }

  fn parse_break_or_continue(&mut self) -> SyntaxResult<NodeId> {
    let t = self.bump();
    let next = self.peek();
    let label = if next.kind.is_identifier_like() && !next.newline_before {
      Some(self.expect_identifier()?.1)
    } else {
      None
    };
    self.require_semicolon()?;
    let loc = t.loc + self.prev_loc();
    Ok(self.alloc(loc, if t.kind == TokenKind::Break {
      Syntax::Break { label }
    } else {
      Syntax::Continue { label }
    }))
  }

  fn parse_module_specifier(&mut self) -> SyntaxResult<String> {
    let t = self.expect(TokenKind::Str)?;
    Ok(normalise_literal_string(self.str(t.loc)))
  }

  fn parse_import(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Import)?.loc;
    let mut default = None;
    let mut namespace = None;
    let mut named = Vec::new();
    if self.peek().kind != TokenKind::Str {
      if self.peek().kind.is_identifier_like() {
        let (loc, name) = self.expect_identifier()?;
        default = Some(self.alloc(loc, Syntax::IdPat { name }));
        self.eat(TokenKind::Comma);
      };
      if self.eat(TokenKind::Star) {
        self.expect(TokenKind::As)?;
        let (loc, name) = self.expect_identifier()?;
        namespace = Some(self.alloc(loc, Syntax::IdPat { name }));
      } else if self.eat(TokenKind::LBrace) {
        while !self.eat(TokenKind::RBrace) {
          let (loc, imported) = if self.peek().kind == TokenKind::Str {
            let t = self.bump();
            (t.loc, normalise_literal_string(self.str(t.loc)))
          } else {
            self.expect_property_name()?
          };
          let (loc, name) = if self.eat(TokenKind::As) {
            self.expect_identifier()?
          } else {
            (loc, imported.clone())
          };
          let local = self.alloc(loc, Syntax::IdPat { name });
          named.push(ImportName { imported, local });
          if self.peek().kind != TokenKind::RBrace {
            self.expect(TokenKind::Comma)?;
          };
        }
      };
      self.expect(TokenKind::From)?;
    };
    let module = self.parse_module_specifier()?;
    self.require_semicolon()?;
    let loc = start + self.prev_loc();
    Ok(self.alloc(loc, Syntax::Import {
      default,
      namespace,
      named,
      module,
    }))
  }

  fn parse_export(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::Export)?.loc;
    let (a, b) = self.peek_pair();
    let (default, declaration) = match a.kind {
      TokenKind::Default => {
        self.bump();
        let (a, b) = self.peek_pair();
        let declaration = match a.kind {
          TokenKind::Function => {
            self.parse_function_with_name(FuncKind::Declaration, false, a.loc, true)?
          }
          TokenKind::Async if b.kind == TokenKind::Function && !b.newline_before => {
            self.bump();
            self.parse_function_with_name(FuncKind::Declaration, true, a.loc, true)?
          }
          TokenKind::Class => self.parse_class_with_name(true, true)?,
          _ => {
            let expression = self.parse_assignment_expr(false)?;
            self.require_semicolon()?;
            let loc = start + self.loc_of(expression);
            return Ok(self.alloc(loc, Syntax::ExportDefaultExpr { expression }));
          }
        };
        (true, declaration)
      }
      TokenKind::Var | TokenKind::Let | TokenKind::Const => (false, self.parse_var_stmt()?),
      TokenKind::Function => (false, self.parse_function(FuncKind::Declaration, false, a.loc)?),
      TokenKind::Async if b.kind == TokenKind::Function => {
        self.bump();
        (false, self.parse_function(FuncKind::Declaration, true, a.loc)?)
      }
      TokenKind::Class => (false, self.parse_class(true)?),
      TokenKind::Star => {
        self.bump();
        let exported = if self.eat(TokenKind::As) {
          Some(self.expect_property_name()?.1)
        } else {
          None
        };
        self.expect(TokenKind::From)?;
        let from = Some(self.parse_module_specifier()?);
        self.require_semicolon()?;
        let loc = start + self.prev_loc();
        return Ok(self.alloc(loc, Syntax::ExportList {
          names: vec![ExportName {
            local: "*".into(),
            exported,
          }],
          from,
        }));
      }
      TokenKind::LBrace => {
        self.bump();
        let mut names = Vec::new();
        while !self.eat(TokenKind::RBrace) {
          let local = self.expect_property_name()?.1;
          let exported = if self.eat(TokenKind::As) {
            Some(self.expect_property_name()?.1)
          } else {
            None
          };
          names.push(ExportName { local, exported });
          if self.peek().kind != TokenKind::RBrace {
            self.expect(TokenKind::Comma)?;
          };
        }
        let from = if self.eat(TokenKind::From) {
          Some(self.parse_module_specifier()?)
        } else {
          None
        };
        self.require_semicolon()?;
        let loc = start + self.prev_loc();
        return Ok(self.alloc(loc, Syntax::ExportList { names, from }));
      }
      _ => return Err(a.error(SyntaxErrorKind::Expected("exportable declaration"))),
    };
    let loc = start + self.loc_of(declaration);
    Ok(self.alloc(loc, Syntax::ExportDecl {
      default,
      declaration,
    }))
  }
}
