//! Arena syntax tree.
//!
//! Nodes live in a single vector and refer to each other by [`NodeId`]. Every
//! node knows its parent. Replacing a node overwrites its slot, so a `NodeId`
//! keeps denoting the same tree position across rewrites, and anything keyed by
//! it (classifications, binding references) stays valid.

use crate::loc::Loc;
use serde::Serialize;
use serde_json::Value;

pub mod stx;

use stx::Syntax;

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Clone, Debug)]
pub struct Node {
  pub loc: Loc,
  pub parent: Option<NodeId>,
  pub stx: Syntax,
}

#[derive(Clone, Debug, Default)]
pub struct Ast {
  nodes: Vec<Node>,
  root: NodeId,
}

impl Ast {
  pub fn new() -> Ast {
    Ast::default()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// The `TopLevel` node, set by the parser.
  pub fn root(&self) -> NodeId {
    self.root
  }

  pub fn set_root(&mut self, root: NodeId) {
    self.root = root;
  }

  /// Allocates a node and adopts its children.
  pub fn alloc(&mut self, loc: Loc, stx: Syntax) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(Node {
      loc,
      parent: None,
      stx,
    });
    self.relink(id);
    id
  }

  /// Discards nodes allocated after `len`. Used when the parser backtracks.
  pub fn truncate(&mut self, len: usize) {
    self.nodes.truncate(len);
  }

  pub fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.index()]
  }

  pub fn stx(&self, id: NodeId) -> &Syntax {
    &self.nodes[id.index()].stx
  }

  /// Callers that change child references must call [`Ast::relink`] afterwards.
  pub fn stx_mut(&mut self, id: NodeId) -> &mut Syntax {
    &mut self.nodes[id.index()].stx
  }

  pub fn loc(&self, id: NodeId) -> Loc {
    self.nodes[id.index()].loc
  }

  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.index()].parent
  }

  pub fn children(&self, id: NodeId) -> Vec<NodeId> {
    self.stx(id).children()
  }

  /// Points the parent link of every child of `id` at `id`.
  pub fn relink(&mut self, id: NodeId) {
    for child in self.children(id) {
      self.nodes[child.index()].parent = Some(id);
    }
  }

  /// Replaces the syntax at `id` in place, keeping its location and parent.
  pub fn replace(&mut self, id: NodeId, stx: Syntax) {
    self.nodes[id.index()].stx = stx;
    self.relink(id);
  }

  /// Allocates a new node that takes over the syntax currently at `id`, so `id` can be
  /// replaced with something that wraps the old contents.
  pub fn detach(&mut self, id: NodeId) -> NodeId {
    let node = self.node(id);
    let (loc, stx) = (node.loc, node.stx.clone());
    let moved = self.alloc(loc, stx);
    self.nodes[moved.index()].parent = Some(id);
    moved
  }

  /// Deep copy of a subtree; the copy has no parent until adopted.
  pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
    let loc = self.loc(id);
    let stx = self.stx(id).clone();
    let stx = stx.map_children(&mut |child| self.clone_subtree(child));
    self.alloc(loc, stx)
  }

  pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
    Ancestors {
      ast: self,
      next: self.parent(id),
    }
  }

  /// Whether `id` is `ancestor` or lies within it.
  pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
    id == ancestor || self.ancestors(id).any(|a| a == ancestor)
  }

  /// All nodes of the subtree rooted at `id`, in pre-order.
  pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(next) = stack.pop() {
      out.push(next);
      let children = self.children(next);
      stack.extend(children.into_iter().rev());
    }
    out
  }

  /// A JSON rendering of the subtree with child ids replaced by the children themselves.
  pub fn to_json(&self, id: NodeId) -> Value {
    let value = serde_json::to_value(self.stx(id)).unwrap_or(Value::Null);
    self.inline_children(value)
  }

  // Numbers in serialized syntax are always node ids; literal values are kept as strings.
  fn inline_children(&self, value: Value) -> Value {
    match value {
      Value::Number(n) => match n.as_u64() {
        Some(raw) if (raw as usize) < self.nodes.len() => self.to_json(NodeId(raw as u32)),
        _ => Value::Number(n),
      },
      Value::Array(items) => Value::Array(items.into_iter().map(|v| self.inline_children(v)).collect()),
      Value::Object(map) => Value::Object(
        map
          .into_iter()
          .map(|(k, v)| (k, self.inline_children(v)))
          .collect(),
      ),
      other => other,
    }
  }
}

pub struct Ancestors<'a> {
  ast: &'a Ast,
  next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let current = self.next?;
    self.next = self.ast.parent(current);
    Some(current)
  }
}
