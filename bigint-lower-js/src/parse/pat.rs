use super::Parser;
use crate::ast::stx::ArrElem;
use crate::ast::stx::ObjMember;
use crate::ast::stx::ObjPatProp;
use crate::ast::stx::PatElem;
use crate::ast::stx::PropKey;
use crate::ast::stx::Syntax;
use crate::ast::NodeId;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::operator::OperatorName;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
  /// Parses a binding pattern, as found in declarations, parameters and catch clauses.
  pub fn parse_pattern(&mut self) -> SyntaxResult<NodeId> {
    match self.peek().kind {
      TokenKind::LBracket => self.parse_arr_pattern(),
      TokenKind::LBrace => self.parse_obj_pattern(),
      _ => {
        let (loc, name) = self.expect_identifier()?;
        Ok(self.alloc(loc, Syntax::IdPat { name }))
      }
    }
  }

  fn parse_pattern_default(&mut self) -> SyntaxResult<Option<NodeId>> {
    if self.eat(TokenKind::Eq) {
      Ok(Some(self.parse_assignment_expr(false)?))
    } else {
      Ok(None)
    }
  }

  fn parse_arr_pattern(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::LBracket)?.loc;
    let mut elements = Vec::new();
    let mut rest = None;
    let end = loop {
      if let Some(end) = self.eat_loc(TokenKind::RBracket) {
        break end;
      };
      if self.eat(TokenKind::Comma) {
        elements.push(None);
        continue;
      };
      if self.eat(TokenKind::Ellipsis) {
        rest = Some(self.parse_pattern()?);
        break self.expect(TokenKind::RBracket)?.loc;
      };
      let target = self.parse_pattern()?;
      let default_value = self.parse_pattern_default()?;
      elements.push(Some(PatElem {
        target,
        default_value,
      }));
      if self.peek().kind != TokenKind::RBracket {
        self.expect(TokenKind::Comma)?;
      };
    };
    Ok(self.alloc(start + end, Syntax::ArrPat { elements, rest }))
  }

  fn parse_obj_pattern(&mut self) -> SyntaxResult<NodeId> {
    let start = self.expect(TokenKind::LBrace)?.loc;
    let mut properties = Vec::new();
    let mut rest = None;
    let end = loop {
      if let Some(end) = self.eat_loc(TokenKind::RBrace) {
        break end;
      };
      if self.eat(TokenKind::Ellipsis) {
        rest = Some(self.parse_pattern()?);
        break self.expect(TokenKind::RBrace)?.loc;
      };
      let key = self.parse_prop_key()?;
      let (target, shorthand) = if self.eat(TokenKind::Colon) {
        (self.parse_pattern()?, false)
      } else {
        let name = key
          .ident
          .clone()
          .ok_or_else(|| key.loc.error(SyntaxErrorKind::Expected("identifier"), None))?;
        (self.alloc(key.loc, Syntax::IdPat { name }), true)
      };
      let default_value = self.parse_pattern_default()?;
      properties.push(ObjPatProp {
        key: key.key,
        target,
        shorthand,
        default_value,
      });
      if self.peek().kind != TokenKind::RBrace {
        self.expect(TokenKind::Comma)?;
      };
    };
    Ok(self.alloc(start + end, Syntax::ObjPat { properties, rest }))
  }

  /// Reinterprets an already parsed expression as the target of `operator`, converting
  /// identifiers and (for plain `=`) array and object literals into patterns in place.
  pub fn to_assignment_target(&mut self, id: NodeId, operator: OperatorName) -> SyntaxResult<()> {
    let loc = self.loc_of(id);
    let invalid = || loc.error(SyntaxErrorKind::InvalidAssignmentTarget, None);
    let destructuring = operator == OperatorName::Assignment;
    match self.ast().stx(id).clone() {
      Syntax::Id { name } => {
        self.ast_mut().replace(id, Syntax::IdPat { name });
      }
      Syntax::Member {
        optional_chaining: false,
        ..
      }
      | Syntax::ComputedMember {
        optional_chaining: false,
        ..
      } => {}
      Syntax::IdPat { .. } => {}
      Syntax::ArrPat { .. } | Syntax::ObjPat { .. } if destructuring => {}
      Syntax::LitArr { elements } if destructuring => {
        let count = elements.len();
        let mut out = Vec::new();
        let mut rest = None;
        for (i, elem) in elements.into_iter().enumerate() {
          match elem {
            ArrElem::Empty => out.push(None),
            ArrElem::Single(e) => out.push(Some(self.to_pat_elem(e)?)),
            ArrElem::Spread(e) if i + 1 == count => {
              self.to_assignment_target(e, OperatorName::Assignment)?;
              rest = Some(e);
            }
            ArrElem::Spread(_) => return Err(invalid()),
          };
        }
        self.ast_mut().replace(id, Syntax::ArrPat {
          elements: out,
          rest,
        });
      }
      Syntax::LitObj { members } if destructuring => {
        let count = members.len();
        let mut properties = Vec::new();
        let mut rest = None;
        for (i, member) in members.into_iter().enumerate() {
          match self.ast().stx(member).clone() {
            Syntax::ObjMember(ObjMember::Prop { key, value }) => {
              let PatElem {
                target,
                default_value,
              } = self.to_pat_elem(value)?;
              // `{a = 1}` arrives as `a: a = 1`.
              let shorthand = matches!(
                (&key, self.ast().stx(target)),
                (PropKey::Direct(raw), Syntax::IdPat { name }) if raw == name
              );
              properties.push(ObjPatProp {
                key,
                target,
                shorthand,
                default_value,
              });
            }
            Syntax::ObjMember(ObjMember::Shorthand { name }) => {
              let ident = self.ast().stx(name).id_name().unwrap_or_default().to_string();
              self.ast_mut().replace(name, Syntax::IdPat {
                name: ident.clone(),
              });
              properties.push(ObjPatProp {
                key: PropKey::Direct(ident),
                target: name,
                shorthand: true,
                default_value: None,
              });
            }
            Syntax::ObjMember(ObjMember::Spread { value }) if i + 1 == count => {
              self.to_assignment_target(value, OperatorName::Assignment)?;
              rest = Some(value);
            }
            _ => return Err(invalid()),
          };
        }
        self.ast_mut().replace(id, Syntax::ObjPat { properties, rest });
      }
      _ => return Err(invalid()),
    };
    Ok(())
  }

  fn to_pat_elem(&mut self, id: NodeId) -> SyntaxResult<PatElem> {
    if let Syntax::Binary {
      operator: OperatorName::Assignment,
      left,
      right,
    } = *self.ast().stx(id)
    {
      // The left side was converted when the assignment was parsed.
      return Ok(PatElem {
        target: left,
        default_value: Some(right),
      });
    };
    self.to_assignment_target(id, OperatorName::Assignment)?;
    Ok(PatElem {
      target: id,
      default_value: None,
    })
  }
}
