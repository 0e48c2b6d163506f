//! Prints an AST back to JavaScript source.
//!
//! Output is normalized: two space indentation, one statement per line and double quoted strings.
//! Parentheses are derived from operator precedence, so the printed text re-parses to the same
//! tree. Comments and original formatting are not preserved.

pub mod escape;
pub mod precedence;

#[cfg(test)]
mod tests;

use crate::ast::stx::ArrElem;
use crate::ast::stx::CallArg;
use crate::ast::stx::ClassMemberValue;
use crate::ast::stx::FuncBody;
use crate::ast::stx::FuncKind;
use crate::ast::stx::MethodKind;
use crate::ast::stx::ObjMember;
use crate::ast::stx::PropKey;
use crate::ast::stx::Syntax;
use crate::ast::stx::TemplatePart;
use crate::ast::stx::VarDeclMode;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::operator::OperatorName;
use escape::emit_string_literal_double_quoted;
use precedence::child_min_prec_for_binary;
use precedence::expr_prec;
use precedence::expr_stmt_needs_parens;
use precedence::leftmost;
use precedence::mixes_nullish;
use precedence::needs_parens;
use precedence::new_callee_needs_parens;
use precedence::operator_prec;
use precedence::starts_with_optional_chaining;
use precedence::Prec;
use precedence::Side;
use precedence::ASSIGNMENT_PRECEDENCE;
use precedence::CALL_MEMBER_PRECEDENCE;
use precedence::EXPRESSION_PRECEDENCE;
use precedence::UNARY_PRECEDENCE;

#[derive(Clone, Copy, Debug)]
pub struct EmitOptions {
  pub indent_width: usize,
}

impl Default for EmitOptions {
  fn default() -> Self {
    EmitOptions { indent_width: 2 }
  }
}

/// Prints the whole tree starting at the root.
pub fn emit(ast: &Ast) -> String {
  emit_with_options(ast, EmitOptions::default())
}

pub fn emit_with_options(ast: &Ast, options: EmitOptions) -> String {
  let mut emitter = Emitter::new(ast, options);
  emitter.stmt(ast.root());
  if !emitter.out.is_empty() {
    emitter.out.push('\n');
  }
  emitter.out
}

/// Prints a single expression without a trailing newline.
pub fn emit_expr(ast: &Ast, node: NodeId) -> String {
  let mut emitter = Emitter::new(ast, EmitOptions::default());
  emitter.expr(node, EXPRESSION_PRECEDENCE);
  emitter.out
}

fn is_word_char(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '\\'
}

fn is_integer_literal(value: &str) -> bool {
  value.bytes().all(|b| b.is_ascii_digit() || b == b'_')
}

fn is_nested_function(ast: &Ast, node: NodeId) -> bool {
  match ast.stx(node) {
    Syntax::Function { .. } => true,
    Syntax::ObjMember(ObjMember::Method { .. }) => true,
    Syntax::ObjMember(ObjMember::Prop { value, .. }) => ast.stx(*value).is_function(),
    _ => false,
  }
}

struct Emitter<'a> {
  ast: &'a Ast,
  options: EmitOptions,
  out: String,
  indent: usize,
}

impl<'a> Emitter<'a> {
  fn new(ast: &'a Ast, options: EmitOptions) -> Self {
    Emitter {
      ast,
      options,
      out: String::new(),
      indent: 0,
    }
  }

  /// Writes a token, separating it from the previous one when the two would otherwise merge.
  fn token(&mut self, text: &str) {
    if let (Some(last), Some(first)) = (self.out.chars().next_back(), text.chars().next()) {
      let merges = (is_word_char(last) && is_word_char(first))
        || (last == '+' && first == '+')
        || (last == '-' && first == '-')
        || (last == '/' && first == '/');
      if merges {
        self.out.push(' ');
      }
    }
    self.out.push_str(text);
  }

  fn raw(&mut self, text: &str) {
    self.out.push_str(text);
  }

  fn begin_line(&mut self) {
    if !self.out.is_empty() {
      self.out.push('\n');
    }
    for _ in 0..self.indent * self.options.indent_width {
      self.out.push(' ');
    }
  }

  fn string(&mut self, value: &str) {
    emit_string_literal_double_quoted(&mut self.out, value);
  }

  fn stmts(&mut self, body: &[NodeId]) {
    for &stmt in body {
      self.begin_line();
      self.stmt(stmt);
    }
  }

  fn block(&mut self, body: &[NodeId]) {
    if body.is_empty() {
      self.token("{}");
      return;
    }
    self.token("{");
    self.indent += 1;
    self.stmts(body);
    self.indent -= 1;
    self.begin_line();
    self.raw("}");
  }

  /// Prints the body of a control statement. Returns whether it was a block, which decides if a
  /// following keyword stays on the same line.
  fn body(&mut self, node: NodeId) -> bool {
    let ast = self.ast;
    match ast.stx(node) {
      Syntax::Block { body } => {
        self.raw(" ");
        self.block(body);
        true
      }
      _ => {
        self.indent += 1;
        self.begin_line();
        self.stmt(node);
        self.indent -= 1;
        false
      }
    }
  }

  fn var_decl(&mut self, mode: VarDeclMode, declarators: &[NodeId]) {
    let ast = self.ast;
    self.token(mode.keyword());
    self.raw(" ");
    for (i, &declarator) in declarators.iter().enumerate() {
      if i > 0 {
        self.raw(", ");
      }
      let Syntax::VarDeclarator {
        pattern,
        initializer,
      } = ast.stx(declarator)
      else {
        continue;
      };
      self.pat(*pattern);
      if let Some(init) = initializer {
        self.raw(" = ");
        self.expr(*init, ASSIGNMENT_PRECEDENCE);
      }
    }
  }

  /// A `VarDecl` or expression in a `for` head, without a semicolon.
  fn for_head(&mut self, node: NodeId) {
    let ast = self.ast;
    match ast.stx(node) {
      Syntax::VarDecl { mode, declarators } => self.var_decl(*mode, declarators),
      Syntax::IdPat { .. } | Syntax::ArrPat { .. } | Syntax::ObjPat { .. } => self.pat(node),
      _ => self.expr(node, EXPRESSION_PRECEDENCE),
    }
  }

  fn stmt(&mut self, node: NodeId) {
    let ast = self.ast;
    match ast.stx(node) {
      Syntax::TopLevel { body } => self.stmts(body),
      Syntax::Block { body } => self.block(body),
      Syntax::Break { label } | Syntax::Continue { label } => {
        self.token(if matches!(ast.stx(node), Syntax::Break { .. }) {
          "break"
        } else {
          "continue"
        });
        if let Some(label) = label {
          self.raw(" ");
          self.token(label);
        }
        self.raw(";");
      }
      Syntax::Debugger => self.token("debugger;"),
      Syntax::Empty => self.raw(";"),
      Syntax::DoWhile { condition, body } => {
        self.token("do");
        if self.body(*body) {
          self.raw(" ");
        } else {
          self.begin_line();
        }
        self.token("while (");
        self.expr(*condition, EXPRESSION_PRECEDENCE);
        self.raw(");");
      }
      Syntax::ExportDefaultExpr { expression } => {
        self.token("export default ");
        if expr_stmt_needs_parens(ast, *expression) {
          self.raw("(");
          self.expr(*expression, ASSIGNMENT_PRECEDENCE);
          self.raw(")");
        } else {
          self.expr(*expression, ASSIGNMENT_PRECEDENCE);
        }
        self.raw(";");
      }
      Syntax::ExportDecl {
        default,
        declaration,
      } => {
        self.token("export ");
        if *default {
          self.token("default ");
        }
        self.stmt(*declaration);
      }
      Syntax::ExportList { names, from } => {
        self.token("export ");
        match names.first() {
          Some(name) if name.local == "*" => {
            self.raw("*");
            if let Some(alias) = &name.exported {
              self.raw(" as ");
              self.token(alias);
            }
          }
          _ => {
            self.raw("{");
            for (i, name) in names.iter().enumerate() {
              if i > 0 {
                self.raw(", ");
              }
              self.token(&name.local);
              if let Some(alias) = &name.exported {
                self.raw(" as ");
                self.token(alias);
              }
            }
            self.raw("}");
          }
        };
        if let Some(module) = from {
          self.raw(" from ");
          self.string(module);
        }
        self.raw(";");
      }
      Syntax::ExprStmt { expression } => {
        if expr_stmt_needs_parens(ast, *expression) {
          self.raw("(");
          self.expr(*expression, EXPRESSION_PRECEDENCE);
          self.raw(")");
        } else {
          self.expr(*expression, EXPRESSION_PRECEDENCE);
        }
        self.raw(";");
      }
      Syntax::ForInOf {
        of,
        await_,
        lhs,
        rhs,
        body,
      } => {
        self.token("for");
        if *await_ {
          self.raw(" await");
        }
        self.raw(" (");
        self.for_head(*lhs);
        if *of {
          self.raw(" of ");
          self.expr(*rhs, ASSIGNMENT_PRECEDENCE);
        } else {
          self.raw(" in ");
          self.expr(*rhs, EXPRESSION_PRECEDENCE);
        }
        self.raw(")");
        self.body(*body);
      }
      Syntax::ForTriple {
        init,
        condition,
        post,
        body,
      } => {
        self.token("for (");
        if let Some(init) = init {
          self.for_head(*init);
        }
        self.raw(";");
        if let Some(condition) = condition {
          self.raw(" ");
          self.expr(*condition, EXPRESSION_PRECEDENCE);
        }
        self.raw(";");
        if let Some(post) = post {
          self.raw(" ");
          self.expr(*post, EXPRESSION_PRECEDENCE);
        }
        self.raw(")");
        self.body(*body);
      }
      Syntax::If {
        test,
        consequent,
        alternate,
      } => {
        self.token("if (");
        self.expr(*test, EXPRESSION_PRECEDENCE);
        self.raw(")");
        // A bare nested `if` would capture our `else`.
        let braced = alternate.is_some() && matches!(ast.stx(*consequent), Syntax::If { .. });
        let consequent_is_block = if braced {
          self.raw(" {");
          self.indent += 1;
          self.begin_line();
          self.stmt(*consequent);
          self.indent -= 1;
          self.begin_line();
          self.raw("}");
          true
        } else {
          self.body(*consequent)
        };
        if let Some(alternate) = alternate {
          if consequent_is_block {
            self.raw(" ");
          } else {
            self.begin_line();
          }
          self.token("else");
          if matches!(ast.stx(*alternate), Syntax::If { .. }) {
            self.raw(" ");
            self.stmt(*alternate);
          } else {
            self.body(*alternate);
          }
        }
      }
      Syntax::Import {
        default,
        namespace,
        named,
        module,
      } => {
        self.token("import ");
        let mut clauses = 0;
        if let Some(default) = default {
          self.pat(*default);
          clauses += 1;
        }
        if let Some(namespace) = namespace {
          if clauses > 0 {
            self.raw(", ");
          }
          self.raw("* as ");
          self.pat(*namespace);
          clauses += 1;
        }
        if !named.is_empty() {
          if clauses > 0 {
            self.raw(", ");
          }
          self.raw("{");
          for (i, name) in named.iter().enumerate() {
            if i > 0 {
              self.raw(", ");
            }
            let local = ast.stx(name.local).id_name().unwrap_or_default();
            if local == name.imported {
              self.token(local);
            } else {
              self.token(&name.imported);
              self.raw(" as ");
              self.token(local);
            }
          }
          self.raw("}");
          clauses += 1;
        }
        if clauses > 0 {
          self.raw(" from ");
        }
        self.string(module);
        self.raw(";");
      }
      Syntax::Label { name, statement } => {
        self.token(name);
        self.raw(": ");
        self.stmt(*statement);
      }
      Syntax::Return { value } => {
        self.token("return");
        if let Some(value) = value {
          self.raw(" ");
          self.expr(*value, EXPRESSION_PRECEDENCE);
        }
        self.raw(";");
      }
      Syntax::Throw { value } => {
        self.token("throw ");
        self.expr(*value, EXPRESSION_PRECEDENCE);
        self.raw(";");
      }
      Syntax::Switch { test, branches } => {
        self.token("switch (");
        self.expr(*test, EXPRESSION_PRECEDENCE);
        self.raw(") {");
        self.indent += 1;
        for &branch in branches {
          let Syntax::SwitchBranch { case, body } = ast.stx(branch) else {
            continue;
          };
          self.begin_line();
          match case {
            Some(case) => {
              self.token("case ");
              self.expr(*case, EXPRESSION_PRECEDENCE);
              self.raw(":");
            }
            None => self.token("default:"),
          };
          self.indent += 1;
          self.stmts(body);
          self.indent -= 1;
        }
        self.indent -= 1;
        self.begin_line();
        self.raw("}");
      }
      Syntax::Try {
        wrapped,
        catch,
        finally,
      } => {
        self.token("try");
        self.body(*wrapped);
        if let Some(catch) = catch {
          if let Syntax::CatchBlock { parameter, body } = ast.stx(*catch) {
            self.raw(" catch");
            if let Some(parameter) = parameter {
              self.raw(" (");
              self.pat(*parameter);
              self.raw(")");
            }
            self.body(*body);
          }
        }
        if let Some(finally) = finally {
          self.raw(" finally");
          self.body(*finally);
        }
      }
      Syntax::VarDecl { mode, declarators } => {
        self.var_decl(*mode, declarators);
        self.raw(";");
      }
      Syntax::While { condition, body } => {
        self.token("while (");
        self.expr(*condition, EXPRESSION_PRECEDENCE);
        self.raw(")");
        self.body(*body);
      }
      Syntax::Function { .. } => self.function(node),
      Syntax::Class { .. } => self.class(node),
      _ => {
        self.expr(node, EXPRESSION_PRECEDENCE);
        self.raw(";");
      }
    };
  }

  fn expr(&mut self, node: NodeId, min: Prec) {
    if needs_parens(expr_prec(self.ast, node), min) {
      self.token("(");
      self.expr_inner(node);
      self.raw(")");
    } else {
      self.expr_inner(node);
    }
  }

  fn parenthesized(&mut self, node: NodeId) {
    self.token("(");
    self.expr_inner(node);
    self.raw(")");
  }

  fn expr_inner(&mut self, node: NodeId) {
    let ast = self.ast;
    match ast.stx(node) {
      Syntax::Id { name } | Syntax::IdPat { name } => self.token(name),
      Syntax::This => self.token("this"),
      Syntax::Super => self.token("super"),
      Syntax::LitBigInt { value } => {
        self.token(value);
        self.raw("n");
      }
      Syntax::LitBool { value } => self.token(if *value { "true" } else { "false" }),
      Syntax::LitNull => self.token("null"),
      Syntax::LitNum { value } | Syntax::LitRegex { value } => self.token(value),
      Syntax::LitStr { value } => self.string(value),
      Syntax::LitTemplate { parts } => self.template(parts),
      Syntax::TaggedTemplate { function, parts } => {
        self.expr(*function, CALL_MEMBER_PRECEDENCE);
        self.template(parts);
      }
      Syntax::LitArr { elements } => {
        self.token("[");
        for (i, elem) in elements.iter().enumerate() {
          if i > 0 {
            self.raw(", ");
          }
          match elem {
            ArrElem::Single(value) => self.expr(*value, ASSIGNMENT_PRECEDENCE),
            ArrElem::Spread(value) => {
              self.raw("...");
              self.expr(*value, ASSIGNMENT_PRECEDENCE);
            }
            ArrElem::Empty => {}
          };
        }
        if matches!(elements.last(), Some(ArrElem::Empty)) {
          self.raw(",");
        }
        self.raw("]");
      }
      Syntax::LitObj { members } => self.object(members),
      Syntax::ObjMember(member) => self.obj_member(member),
      Syntax::Unary { operator, argument } => {
        self.token(operator.syntax());
        if matches!(
          operator,
          OperatorName::Typeof
            | OperatorName::Void
            | OperatorName::Delete
            | OperatorName::Await
            | OperatorName::Yield
            | OperatorName::YieldDelegated
        ) {
          self.raw(" ");
        }
        let min = match operator {
          OperatorName::Yield | OperatorName::YieldDelegated => ASSIGNMENT_PRECEDENCE,
          _ => UNARY_PRECEDENCE,
        };
        self.expr(*argument, min);
      }
      Syntax::UnaryPostfix { operator, argument } => {
        self.expr(*argument, operator_prec(*operator).tighter());
        self.raw(operator.syntax());
      }
      Syntax::Binary {
        operator,
        left,
        right,
      } => self.binary(*operator, *left, *right),
      Syntax::Cond {
        test,
        consequent,
        alternate,
      } => {
        self.expr(*test, operator_prec(OperatorName::Conditional).tighter());
        self.raw(" ? ");
        self.expr(*consequent, ASSIGNMENT_PRECEDENCE);
        self.raw(" : ");
        self.expr(*alternate, ASSIGNMENT_PRECEDENCE);
      }
      Syntax::Call {
        optional_chaining,
        callee,
        arguments,
      } => {
        self.expr(*callee, CALL_MEMBER_PRECEDENCE);
        if *optional_chaining {
          self.raw("?.");
        }
        self.arguments(arguments);
      }
      Syntax::New { callee, arguments } => {
        self.token("new ");
        if new_callee_needs_parens(ast, *callee) || starts_with_optional_chaining(ast, *callee) {
          self.parenthesized(*callee);
        } else {
          self.expr(*callee, CALL_MEMBER_PRECEDENCE);
        }
        self.arguments(arguments);
      }
      Syntax::Member {
        optional_chaining,
        left,
        right,
      } => {
        match ast.stx(*left) {
          // `1.toString` would lex as a malformed number.
          Syntax::LitNum { value } if is_integer_literal(value) => self.parenthesized(*left),
          _ => self.expr(*left, CALL_MEMBER_PRECEDENCE),
        };
        self.raw(if *optional_chaining { "?." } else { "." });
        self.raw(right);
      }
      Syntax::ComputedMember {
        optional_chaining,
        object,
        member,
      } => {
        self.expr(*object, CALL_MEMBER_PRECEDENCE);
        if *optional_chaining {
          self.raw("?.");
        }
        self.raw("[");
        self.expr(*member, EXPRESSION_PRECEDENCE);
        self.raw("]");
      }
      Syntax::Function { .. } => self.function(node),
      Syntax::Class { .. } => self.class(node),
      Syntax::ArrPat { .. } | Syntax::ObjPat { .. } => self.pat(node),
      _ => {}
    };
  }

  fn binary(&mut self, operator: OperatorName, left: NodeId, right: NodeId) {
    let ast = self.ast;
    if operator.is_assignment() {
      self.pat(left);
      self.raw(" ");
      self.raw(operator.syntax());
      self.raw(" ");
      self.expr(right, child_min_prec_for_binary(operator, Side::Right));
      return;
    }
    // `-a ** b` is a syntax error.
    let force_left = mixes_nullish(ast, operator, left)
      || (operator == OperatorName::Exponentiation && matches!(ast.stx(left), Syntax::Unary { .. }));
    if force_left {
      self.parenthesized(left);
    } else {
      self.expr(left, child_min_prec_for_binary(operator, Side::Left));
    }
    if operator == OperatorName::Comma {
      self.raw(", ");
    } else {
      self.raw(" ");
      self.raw(operator.syntax());
      self.raw(" ");
    }
    if mixes_nullish(ast, operator, right) {
      self.parenthesized(right);
    } else {
      self.expr(right, child_min_prec_for_binary(operator, Side::Right));
    }
  }

  fn arguments(&mut self, arguments: &[CallArg]) {
    self.raw("(");
    for (i, arg) in arguments.iter().enumerate() {
      if i > 0 {
        self.raw(", ");
      }
      if arg.spread {
        self.raw("...");
      }
      self.expr(arg.value, ASSIGNMENT_PRECEDENCE);
    }
    self.raw(")");
  }

  fn template(&mut self, parts: &[TemplatePart]) {
    self.raw("`");
    for part in parts {
      match part {
        TemplatePart::String(raw) => self.raw(raw),
        TemplatePart::Substitution(expr) => {
          self.raw("${");
          self.expr(*expr, EXPRESSION_PRECEDENCE);
          self.raw("}");
        }
      };
    }
    self.raw("`");
  }

  fn prop_key(&mut self, key: &PropKey) {
    match key {
      PropKey::Direct(name) => self.token(name),
      PropKey::Computed(expr) => {
        self.token("[");
        self.expr(*expr, ASSIGNMENT_PRECEDENCE);
        self.raw("]");
      }
    };
  }

  fn object(&mut self, members: &[NodeId]) {
    let ast = self.ast;
    if members.is_empty() {
      self.token("{}");
      return;
    }
    // Objects holding functions are laid out one member per line.
    let multiline = members.iter().any(|&m| is_nested_function(ast, m));
    self.token("{");
    if multiline {
      self.indent += 1;
    }
    for (i, &member) in members.iter().enumerate() {
      if multiline {
        self.begin_line();
      } else if i > 0 {
        self.raw(" ");
      }
      self.expr_inner(member);
      if i + 1 < members.len() {
        self.raw(",");
      }
    }
    if multiline {
      self.indent -= 1;
      self.begin_line();
    }
    self.raw("}");
  }

  fn obj_member(&mut self, member: &ObjMember) {
    match member {
      ObjMember::Prop { key, value } => {
        self.prop_key(key);
        self.raw(": ");
        self.expr(*value, ASSIGNMENT_PRECEDENCE);
      }
      ObjMember::Shorthand { name } => self.expr_inner(*name),
      ObjMember::Method { key, kind, func } => {
        self.method_head(*kind, *func);
        self.prop_key(key);
        self.function(*func);
      }
      ObjMember::Spread { value } => {
        self.token("...");
        self.expr(*value, ASSIGNMENT_PRECEDENCE);
      }
    };
  }

  fn method_head(&mut self, kind: MethodKind, func: NodeId) {
    match kind {
      MethodKind::Getter => self.token("get "),
      MethodKind::Setter => self.token("set "),
      MethodKind::Method => {
        let ast = self.ast;
        if let Syntax::Function {
          async_, generator, ..
        } = ast.stx(func)
        {
          if *async_ {
            self.token("async ");
          }
          if *generator {
            self.token("*");
          }
        }
      }
    };
  }

  fn params(&mut self, params: &[NodeId]) {
    let ast = self.ast;
    self.raw("(");
    for (i, &param) in params.iter().enumerate() {
      if i > 0 {
        self.raw(", ");
      }
      let Syntax::ParamDecl {
        rest,
        pattern,
        default_value,
      } = ast.stx(param)
      else {
        continue;
      };
      if *rest {
        self.raw("...");
      }
      self.pat(*pattern);
      if let Some(default) = default_value {
        self.raw(" = ");
        self.expr(*default, ASSIGNMENT_PRECEDENCE);
      }
    }
    self.raw(")");
  }

  fn function(&mut self, node: NodeId) {
    let ast = self.ast;
    let Syntax::Function {
      kind,
      name,
      async_,
      generator,
      params,
      body,
    } = ast.stx(node)
    else {
      return;
    };
    match kind {
      FuncKind::Arrow => {
        if *async_ {
          self.token("async ");
        }
        self.params(params);
        self.raw(" => ");
      }
      FuncKind::Method => self.params(params),
      FuncKind::Declaration | FuncKind::Expression => {
        if *async_ {
          self.token("async ");
        }
        self.token("function");
        if *generator {
          self.raw("*");
        }
        if let Some(name) = name {
          self.raw(" ");
          self.pat(*name);
        }
        self.params(params);
      }
    };
    match body {
      FuncBody::Block(stmts) => {
        if *kind != FuncKind::Arrow {
          self.raw(" ");
        }
        self.block(stmts);
      }
      FuncBody::Expression(expr) => {
        if matches!(ast.stx(leftmost(ast, *expr)), Syntax::LitObj { .. }) {
          self.parenthesized(*expr);
        } else {
          self.expr(*expr, ASSIGNMENT_PRECEDENCE);
        }
      }
    };
  }

  fn class(&mut self, node: NodeId) {
    let ast = self.ast;
    let Syntax::Class {
      name,
      extends,
      members,
      ..
    } = ast.stx(node)
    else {
      return;
    };
    self.token("class");
    if let Some(name) = name {
      self.raw(" ");
      self.pat(*name);
    }
    if let Some(extends) = extends {
      self.raw(" extends ");
      self.expr(*extends, CALL_MEMBER_PRECEDENCE);
    }
    if members.is_empty() {
      self.raw(" {}");
      return;
    }
    self.raw(" {");
    self.indent += 1;
    for &member in members {
      let Syntax::ClassMember {
        static_,
        key,
        value,
      } = ast.stx(member)
      else {
        continue;
      };
      self.begin_line();
      if *static_ {
        self.token("static ");
      }
      match value {
        ClassMemberValue::Method { kind, func } => {
          self.method_head(*kind, *func);
          self.prop_key(key);
          self.function(*func);
        }
        ClassMemberValue::Field { initializer } => {
          self.prop_key(key);
          if let Some(init) = initializer {
            self.raw(" = ");
            self.expr(*init, ASSIGNMENT_PRECEDENCE);
          }
          self.raw(";");
        }
      };
    }
    self.indent -= 1;
    self.begin_line();
    self.raw("}");
  }

  fn pat(&mut self, node: NodeId) {
    let ast = self.ast;
    match ast.stx(node) {
      Syntax::IdPat { name } | Syntax::Id { name } => self.token(name),
      Syntax::ArrPat { elements, rest } => {
        self.token("[");
        for (i, elem) in elements.iter().enumerate() {
          if i > 0 {
            self.raw(", ");
          }
          if let Some(elem) = elem {
            self.pat(elem.target);
            if let Some(default) = elem.default_value {
              self.raw(" = ");
              self.expr(default, ASSIGNMENT_PRECEDENCE);
            }
          }
        }
        if let Some(rest) = rest {
          if !elements.is_empty() {
            self.raw(", ");
          }
          self.raw("...");
          self.pat(*rest);
        } else if matches!(elements.last(), Some(None)) {
          self.raw(",");
        }
        self.raw("]");
      }
      Syntax::ObjPat { properties, rest } => {
        self.token("{");
        for (i, prop) in properties.iter().enumerate() {
          if i > 0 {
            self.raw(", ");
          }
          if !prop.shorthand {
            self.prop_key(&prop.key);
            self.raw(": ");
          }
          self.pat(prop.target);
          if let Some(default) = prop.default_value {
            self.raw(" = ");
            self.expr(default, ASSIGNMENT_PRECEDENCE);
          }
        }
        if let Some(rest) = rest {
          if !properties.is_empty() {
            self.raw(", ");
          }
          self.raw("...");
          self.pat(*rest);
        }
        self.raw("}");
      }
      _ => self.expr(node, CALL_MEMBER_PRECEDENCE),
    };
  }
}
