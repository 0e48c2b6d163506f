use super::Binding;
use super::Bindings;
use super::DeclKind;
use super::ScopeId;
use super::ScopeKind;
use crate::ast::stx::ExportName;
use crate::ast::stx::FuncBody;
use crate::ast::stx::FuncKind;
use crate::ast::stx::Syntax;
use crate::ast::stx::VarDeclMode;
use crate::ast::stx::PropKey;
use crate::ast::Ast;
use crate::ast::NodeId;

/// An identifier use waiting for resolution.
#[derive(Debug, Clone)]
pub struct PendingUse {
  pub node: NodeId,
  pub name: String,
  pub scope: ScopeId,
  /// The writing node when the use is an assignment target.
  pub violation: Option<NodeId>,
}

/// Output of [`declare()`], consumed by [`super::resolve()`].
pub struct Declared {
  pub bindings: Bindings,
  pub uses: Vec<PendingUse>,
  pub exports: Vec<(ScopeId, String)>,
}

struct Declarer<'a> {
  ast: &'a Ast,
  bindings: Bindings,
  uses: Vec<PendingUse>,
  exports: Vec<(ScopeId, String)>,
  scope: ScopeId,
}

pub fn declare(ast: &Ast) -> Declared {
  let mut bindings = Bindings::default();
  let top = bindings.add_scope(None, ScopeKind::Global, ast.root());
  let mut declarer = Declarer {
    ast,
    bindings,
    uses: Vec::new(),
    exports: Vec::new(),
    scope: top,
  };
  declarer.visit(ast.root());
  Declared {
    bindings: declarer.bindings,
    uses: declarer.uses,
    exports: declarer.exports,
  }
}

impl<'a> Declarer<'a> {
  fn push_scope(&mut self, kind: ScopeKind, node: NodeId) -> ScopeId {
    let outer = self.scope;
    self.scope = self.bindings.add_scope(Some(outer), kind, node);
    outer
  }

  fn closure_scope(&self) -> ScopeId {
    let mut current = self.scope;
    loop {
      let data = self.bindings.scope(current);
      match data.parent {
        Some(parent) if !data.kind.is_closure() => current = parent,
        _ => return current,
      };
    }
  }

  fn declare_name(&mut self, ident: NodeId, kind: DeclKind, decl: NodeId) {
    let Some(name) = self.ast.stx(ident).id_name() else {
      return;
    };
    let scope = if kind == DeclKind::Var {
      self.closure_scope()
    } else {
      self.scope
    };
    if let Some(&existing) = self.bindings.scope(scope).symbols.get(name) {
      self.bindings.resolved.insert(ident, existing);
      let writes = match self.ast.stx(decl) {
        Syntax::VarDeclarator { initializer, .. } => initializer.is_some(),
        Syntax::Function { .. } => true,
        _ => false,
      };
      let symbol = &mut self.bindings.symbols[existing.raw() as usize];
      if kind.is_var_like() && symbol.kind.is_var_like() && writes {
        symbol.violations.push(decl);
      };
      return;
    };
    let symbol = self.bindings.add_symbol(Binding {
      name: name.to_string(),
      kind,
      decl,
      ident,
      scope,
      constant: true,
      exported: false,
      violations: Vec::new(),
      references: Vec::new(),
    });
    self.bindings.resolved.insert(ident, symbol);
  }

  fn use_name(&mut self, node: NodeId, violation: Option<NodeId>) {
    let Some(name) = self.ast.stx(node).id_name() else {
      return;
    };
    self.uses.push(PendingUse {
      node,
      name: name.to_string(),
      scope: self.scope,
      violation,
    });
  }

  fn visit_key(&mut self, key: &PropKey) {
    if let PropKey::Computed(expr) = key {
      self.visit(*expr);
    };
  }

  /// Declares every identifier in a binding pattern; defaults and computed keys are ordinary code.
  fn declare_pattern(&mut self, pattern: NodeId, kind: DeclKind, decl: NodeId) {
    let ast = self.ast;
    match ast.stx(pattern) {
      Syntax::IdPat { .. } => self.declare_name(pattern, kind, decl),
      Syntax::ArrPat { elements, rest } => {
        for elem in elements.iter().flatten() {
          self.declare_pattern(elem.target, kind, decl);
          if let Some(default_value) = elem.default_value {
            self.visit(default_value);
          };
        }
        if let Some(rest) = rest {
          self.declare_pattern(*rest, kind, decl);
        };
      }
      Syntax::ObjPat { properties, rest } => {
        for prop in properties {
          self.visit_key(&prop.key);
          self.declare_pattern(prop.target, kind, decl);
          if let Some(default_value) = prop.default_value {
            self.visit(default_value);
          };
        }
        if let Some(rest) = rest {
          self.declare_pattern(*rest, kind, decl);
        };
      }
      _ => self.visit(pattern),
    }
  }

  /// Visits the target of an assignment, attributing identifier writes to `violation`.
  fn visit_target(&mut self, target: NodeId, violation: NodeId) {
    let ast = self.ast;
    match ast.stx(target) {
      Syntax::IdPat { .. } | Syntax::Id { .. } => self.use_name(target, Some(violation)),
      Syntax::ArrPat { elements, rest } => {
        for elem in elements.iter().flatten() {
          self.visit_target(elem.target, violation);
          if let Some(default_value) = elem.default_value {
            self.visit(default_value);
          };
        }
        if let Some(rest) = rest {
          self.visit_target(*rest, violation);
        };
      }
      Syntax::ObjPat { properties, rest } => {
        for prop in properties {
          self.visit_key(&prop.key);
          self.visit_target(prop.target, violation);
          if let Some(default_value) = prop.default_value {
            self.visit(default_value);
          };
        }
        if let Some(rest) = rest {
          self.visit_target(*rest, violation);
        };
      }
      _ => self.visit(target),
    }
  }

  fn export_names_of(&mut self, declaration: NodeId) {
    let ast = self.ast;
    let idents = match ast.stx(declaration) {
      Syntax::Function { name, .. } | Syntax::Class { name, .. } => name.iter().copied().collect(),
      Syntax::VarDecl { declarators, .. } => declarators
        .iter()
        .flat_map(|&d| ast.descendants(d))
        .filter(|&n| matches!(ast.stx(n), Syntax::IdPat { .. }))
        .collect(),
      _ => Vec::new(),
    };
    for ident in idents {
      if let Some(name) = ast.stx(ident).id_name() {
        self.exports.push((self.scope, name.to_string()));
      };
    }
  }

  fn visit_function(&mut self, id: NodeId) {
    let ast = self.ast;
    let Syntax::Function {
      kind,
      name,
      params,
      body,
      ..
    } = ast.stx(id)
    else {
      return;
    };
    let outer = self.scope;
    match (kind, name) {
      (FuncKind::Declaration, Some(name)) => self.declare_name(*name, DeclKind::Function, id),
      (FuncKind::Expression, Some(name)) => {
        self.push_scope(ScopeKind::FunctionExpressionName, id);
        self.declare_name(*name, DeclKind::FunctionExpressionName, id);
      }
      _ => {}
    };
    let scope_kind = if *kind == FuncKind::Arrow {
      ScopeKind::ArrowFunction
    } else {
      ScopeKind::NonArrowFunction
    };
    self.push_scope(scope_kind, id);
    for &param in params {
      if let Syntax::ParamDecl {
        pattern,
        default_value,
        ..
      } = ast.stx(param)
      {
        self.declare_pattern(*pattern, DeclKind::Param, param);
        if let Some(default_value) = default_value {
          self.visit(*default_value);
        };
      };
    }
    match body {
      FuncBody::Block(stmts) => {
        for &stmt in stmts {
          self.visit(stmt);
        }
      }
      FuncBody::Expression(expr) => self.visit(*expr),
    };
    self.scope = outer;
  }

  fn visit(&mut self, id: NodeId) {
    let ast = self.ast;
    match ast.stx(id) {
      Syntax::Block { body } => {
        let outer = self.push_scope(ScopeKind::Block, id);
        for &stmt in body {
          self.visit(stmt);
        }
        self.scope = outer;
      }
      Syntax::VarDecl { mode, declarators } => {
        let kind = match mode {
          VarDeclMode::Var => DeclKind::Var,
          VarDeclMode::Let => DeclKind::Let,
          VarDeclMode::Const => DeclKind::Const,
        };
        for &declarator in declarators {
          if let Syntax::VarDeclarator {
            pattern,
            initializer,
          } = ast.stx(declarator)
          {
            self.declare_pattern(*pattern, kind, declarator);
            if let Some(initializer) = initializer {
              self.visit(*initializer);
            };
          };
        }
      }
      Syntax::Function { .. } => self.visit_function(id),
      Syntax::Class {
        declaration,
        name,
        extends,
        members,
      } => {
        if let (true, Some(name)) = (declaration, name) {
          self.declare_name(*name, DeclKind::Class, id);
        };
        if let Some(extends) = extends {
          self.visit(*extends);
        };
        let outer = self.push_scope(ScopeKind::Class, id);
        if let (false, Some(name)) = (declaration, name) {
          self.declare_name(*name, DeclKind::Class, id);
        };
        for &member in members {
          self.visit(member);
        }
        self.scope = outer;
      }
      Syntax::CatchBlock { parameter, body } => {
        let outer = self.push_scope(ScopeKind::Block, id);
        if let Some(parameter) = parameter {
          self.declare_pattern(*parameter, DeclKind::Catch, id);
        };
        self.visit(*body);
        self.scope = outer;
      }
      Syntax::ForTriple { .. } => {
        let outer = self.push_scope(ScopeKind::Block, id);
        for child in ast.children(id) {
          self.visit(child);
        }
        self.scope = outer;
      }
      Syntax::ForInOf { lhs, rhs, body, .. } => {
        let outer = self.push_scope(ScopeKind::Block, id);
        if matches!(ast.stx(*lhs), Syntax::VarDecl { .. }) {
          self.visit(*lhs);
        } else {
          self.visit_target(*lhs, id);
        };
        self.visit(*rhs);
        self.visit(*body);
        self.scope = outer;
      }
      Syntax::Switch { test, branches } => {
        self.visit(*test);
        let outer = self.push_scope(ScopeKind::Block, id);
        for &branch in branches {
          self.visit(branch);
        }
        self.scope = outer;
      }
      Syntax::Import {
        default,
        namespace,
        named,
        ..
      } => {
        for local in default
          .iter()
          .chain(namespace.iter())
          .copied()
          .chain(named.iter().map(|n| n.local))
        {
          self.declare_name(local, DeclKind::Import, id);
        }
      }
      Syntax::ExportDecl { declaration, .. } => {
        self.visit(*declaration);
        self.export_names_of(*declaration);
      }
      Syntax::ExportList { names, from: None } => {
        for ExportName { local, .. } in names {
          self.exports.push((self.scope, local.clone()));
        }
      }
      Syntax::Binary {
        operator,
        left,
        right,
      } if operator.is_assignment() => {
        self.visit_target(*left, id);
        self.visit(*right);
      }
      Syntax::Unary { operator, argument } | Syntax::UnaryPostfix { operator, argument }
        if operator.is_update() =>
      {
        self.visit_target(*argument, id);
      }
      Syntax::Id { .. } | Syntax::IdPat { .. } => self.use_name(id, None),
      _ => {
        for child in ast.children(id) {
          self.visit(child);
        }
      }
    }
  }
}
