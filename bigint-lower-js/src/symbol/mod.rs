//! Lexical scopes and bindings for a parsed unit.
//!
//! Binding runs in two passes over the arena:
//! - [`declare()`] walks the tree, allocates [`ScopeId`]s and [`SymbolId`]s, declares every binding
//!   identifier pattern, and queues every identifier use together with the scope it appears in.
//! - [`resolve()`] resolves the queued uses against the scope chain, recording read sites
//!   ("references") and assignment sites ("violations") on each [`Binding`].
//!
//! `var` bindings hoist to the nearest function (or the top level). Because resolution only starts
//! once every declaration is known, hoisted and block-scoped names are visible throughout their scope
//! regardless of source order. Temporal dead zones are not modeled.
//!
//! A binding is *constant* when nothing other than its declaration writes to it. Writes are:
//! assignment expressions (plain, compound and logical), update expressions, `for-in`/`for-of` heads
//! that are not declarations, and redeclarations of a `var` or function name.

use crate::ast::Ast;
use crate::ast::NodeId;
use crate::ast::stx::Syntax;
use ahash::HashMap;
use ahash::HashSet;
use std::collections::BTreeMap;

pub mod declare;
pub mod resolve;

pub use declare::declare;
pub use resolve::resolve;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
  pub fn raw(self) -> u32 {
    self.0
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
  pub fn raw(self) -> u32 {
    self.0
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
  Global,
  Class,
  NonArrowFunction,
  ArrowFunction,
  // Blocks, `for` heads, `switch` bodies and catch clauses.
  Block,
  FunctionExpressionName,
}

impl ScopeKind {
  pub fn is_closure(self) -> bool {
    matches!(
      self,
      ScopeKind::Global | ScopeKind::NonArrowFunction | ScopeKind::ArrowFunction
    )
  }
}

#[derive(Debug, Clone)]
pub struct ScopeData {
  pub parent: Option<ScopeId>,
  pub kind: ScopeKind,
  // The node that opened the scope.
  pub node: NodeId,
  pub symbols: BTreeMap<String, SymbolId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
  Var,
  Let,
  Const,
  Param,
  Function,
  FunctionExpressionName,
  Class,
  Import,
  Catch,
}

impl DeclKind {
  /// Kinds that may be declared again in the same scope.
  pub fn is_var_like(self) -> bool {
    matches!(self, DeclKind::Var | DeclKind::Function | DeclKind::Param)
  }
}

#[derive(Debug, Clone)]
pub struct Binding {
  pub name: String,
  pub kind: DeclKind,
  /// The declaring node: a `VarDeclarator`, `ParamDecl`, `Function`, `Class`, `Import` or
  /// `CatchBlock`.
  pub decl: NodeId,
  /// The `IdPat` that introduced the name.
  pub ident: NodeId,
  pub scope: ScopeId,
  pub constant: bool,
  /// Whether the name is exported from the unit, which hides some of its uses.
  pub exported: bool,
  /// Writes other than the declaration, in source order.
  pub violations: Vec<NodeId>,
  /// Reads, in source order.
  pub references: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Bindings {
  scopes: Vec<ScopeData>,
  symbols: Vec<Binding>,
  resolved: HashMap<NodeId, SymbolId>,
  // Names read or written without a declaration, i.e. globals.
  free_names: HashSet<String>,
}

impl Bindings {
  pub fn scope(&self, id: ScopeId) -> &ScopeData {
    &self.scopes[id.0 as usize]
  }

  pub fn binding(&self, id: SymbolId) -> &Binding {
    &self.symbols[id.0 as usize]
  }

  pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Binding)> + '_ {
    self
      .symbols
      .iter()
      .enumerate()
      .map(|(i, b)| (SymbolId(i as u32), b))
  }

  /// The symbol an `Id` or `IdPat` node declares or refers to.
  pub fn binding_of(&self, node: NodeId) -> Option<SymbolId> {
    self.resolved.get(&node).copied()
  }

  pub fn lookup(&self, node: NodeId) -> Option<&Binding> {
    self.binding_of(node).map(|s| self.binding(s))
  }

  /// The function whose parameter list or body declares the symbol.
  pub fn declaring_function(&self, ast: &Ast, symbol: SymbolId) -> Option<NodeId> {
    let decl = self.binding(symbol).decl;
    ast
      .ancestors(decl)
      .find(|&a| matches!(ast.stx(a), Syntax::Function { .. }))
  }

  /// Makes a copy of an identifier resolve like the original, as a further read.
  pub fn register_alias(&mut self, original: NodeId, alias: NodeId) {
    if let Some(symbol) = self.binding_of(original) {
      self.resolved.insert(alias, symbol);
      self.symbols[symbol.0 as usize].references.push(alias);
    };
  }

  /// Whether a new top-level name would collide with any declared or global name.
  pub fn is_name_used(&self, name: &str) -> bool {
    self.free_names.contains(name) || self.symbols.iter().any(|b| b.name == name)
  }

  fn add_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind, node: NodeId) -> ScopeId {
    let id = ScopeId(self.scopes.len() as u32);
    self.scopes.push(ScopeData {
      parent,
      kind,
      node,
      symbols: BTreeMap::new(),
    });
    id
  }

  fn add_symbol(&mut self, binding: Binding) -> SymbolId {
    let id = SymbolId(self.symbols.len() as u32);
    self
      .scopes[binding.scope.0 as usize]
      .symbols
      .insert(binding.name.clone(), id);
    self.symbols.push(binding);
    id
  }

  /// Walks from `scope` outwards until `name` is found.
  pub fn resolve_name_in_scope(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
    let mut current = Some(scope);
    while let Some(scope_id) = current {
      let data = self.scope(scope_id);
      if let Some(&symbol) = data.symbols.get(name) {
        return Some(symbol);
      };
      current = data.parent;
    }
    None
  }
}

/// Runs both passes over the unit rooted at `ast.root()`.
pub fn bind(ast: &Ast) -> Bindings {
  let declared = declare(ast);
  resolve(declared)
}

#[cfg(test)]
mod tests;
