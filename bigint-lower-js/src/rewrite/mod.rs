//! Replaces BigInt syntax with library calls, in place.
//!
//! The walk is pre-order: a node is lowered first, then the walk continues into whatever children
//! the node has afterwards. Lowering moves the original operand nodes under the new call instead of
//! copying them, so operands keep their [`NodeId`] and are visited exactly once, and memoized
//! classifications stay attached to the right positions.

use crate::ast::stx::CallArg;
use crate::ast::stx::FuncBody;
use crate::ast::stx::Syntax;
use crate::ast::stx::VarDeclMode;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::classify::Classification;
use crate::classify::Classifier;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::FileId;
use crate::err::UnsupportedConstruct;
use crate::library::binary_function;
use crate::library::relational_function;
use crate::library::unary_function;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::parse::literal::bigint_value;
use crate::symbol::Bindings;
use crate::DISPATCH_SHIM_NAMESPACE;
use crate::LIBRARY_NAMESPACE;
use ahash::HashSet;
use num_bigint::BigUint;
use tracing::debug;

pub mod validate;
#[cfg(test)]
mod tests;

pub use validate::validate;
pub use validate::GuardSet;

/// `Number.MAX_SAFE_INTEGER`. Literals up to it are passed to the library as numbers.
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

#[derive(Debug, Default)]
pub struct RewriteOutcome {
  pub replacements: usize,
  /// Whether any call targets the dispatch shim.
  pub uses_dispatch_shim: bool,
  pub diagnostics: Vec<Diagnostic>,
}

pub struct Rewriter<'a> {
  ast: &'a mut Ast,
  bindings: &'a mut Bindings,
  classifier: Classifier,
  guards: GuardSet,
  // Temporaries to declare, per function (or top level), in allocation order.
  temps: Vec<(NodeId, Vec<String>)>,
  taken: HashSet<String>,
  outcome: RewriteOutcome,
}

fn is_directive(ast: &Ast, stmt: NodeId) -> bool {
  matches!(
    ast.stx(stmt),
    Syntax::ExprStmt { expression } if matches!(ast.stx(*expression), Syntax::LitStr { .. })
  )
}

fn directive_count(ast: &Ast, stmts: &[NodeId]) -> usize {
  stmts.iter().take_while(|&&s| is_directive(ast, s)).count()
}

impl<'a> Rewriter<'a> {
  pub fn new(ast: &'a mut Ast, bindings: &'a mut Bindings, file: FileId) -> Rewriter<'a> {
    Rewriter {
      ast,
      bindings,
      classifier: Classifier::new(file),
      guards: GuardSet::default(),
      temps: Vec::new(),
      taken: HashSet::default(),
      outcome: RewriteOutcome::default(),
    }
  }

  /// Validates, then lowers the whole unit except the subtree at `skip`. Nothing is changed when
  /// validation fails.
  pub fn run(mut self, skip: Option<NodeId>) -> Result<RewriteOutcome, UnsupportedConstruct> {
    let root = self.ast.root();
    self.guards = validate(self.ast, root, skip)?;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
      if Some(node) == skip {
        continue;
      };
      self.lower(node);
      stack.extend(self.ast.children(node).into_iter().rev());
    }
    self.declare_temps();
    self.outcome.diagnostics = self.classifier.take_diagnostics();
    Ok(self.outcome)
  }

  fn classify(&mut self, node: NodeId) -> Classification {
    self.classifier.classify(self.ast, self.bindings, node)
  }

  // The object calls are routed to, if any.
  fn target(&mut self, classification: Classification) -> Option<&'static str> {
    match classification {
      Classification::Native => None,
      Classification::BigInt => Some(LIBRARY_NAMESPACE),
      Classification::Unknown => {
        self.outcome.uses_dispatch_shim = true;
        Some(DISPATCH_SHIM_NAMESPACE)
      }
    }
  }

  fn alloc(&mut self, loc: Loc, stx: Syntax) -> NodeId {
    self.ast.alloc(loc, stx)
  }

  fn id(&mut self, loc: Loc, name: &str) -> NodeId {
    self.alloc(loc, Syntax::Id {
      name: name.to_string(),
    })
  }

  fn member(&mut self, loc: Loc, object: &str, property: &str) -> Syntax {
    Syntax::Member {
      optional_chaining: false,
      left: self.id(loc, object),
      right: property.to_string(),
    }
  }

  fn call(&mut self, loc: Loc, object: &str, method: &str, arguments: Vec<NodeId>) -> Syntax {
    let callee = self.member(loc, object, method);
    Syntax::Call {
      optional_chaining: false,
      callee: self.alloc(loc, callee),
      arguments: arguments
        .into_iter()
        .map(|value| CallArg {
          spread: false,
          value,
        })
        .collect(),
    }
  }

  fn replace(&mut self, node: NodeId, stx: Syntax, what: &'static str) {
    debug!(target: "bigint_lower_js::rewrite", ?node, what, "replaced");
    self.ast.replace(node, stx);
    self.outcome.replacements += 1;
  }

  fn lower(&mut self, node: NodeId) {
    match self.ast.stx(node).clone() {
      Syntax::LitBigInt { value } => self.lower_literal(node, &value),
      Syntax::Binary {
        operator,
        left,
        right,
      } => {
        if operator.is_assignment() {
          self.lower_compound_assignment(node, operator, left, right);
        } else if let Some(method) = binary_function(operator) {
          let classification = self.classify(node);
          self.lower_operator(node, classification, method, vec![left, right]);
        } else if let Some(method) = relational_function(operator) {
          let classification = self.classify(left).meet(self.classify(right));
          if !self.lower_operator(node, classification, method, vec![left, right]) {
            self.lower_bigint_guard(node, operator, left, right);
          };
        };
      }
      Syntax::Unary { operator, argument } => {
        if let Some(method) = unary_function(operator) {
          let classification = self.classify(node);
          self.lower_operator(node, classification, method, vec![argument]);
        };
      }
      Syntax::Call {
        callee, arguments, ..
      } => self.lower_call(callee, &arguments),
      _ => {}
    };
  }

  fn lower_literal(&mut self, node: NodeId, digits: &str) {
    let Some(value) = bigint_value(digits) else {
      return;
    };
    let loc = self.ast.loc(node);
    let decimal = value.to_string();
    let argument = if value <= BigUint::from(MAX_SAFE_INTEGER) {
      Syntax::LitNum { value: decimal }
    } else {
      Syntax::LitStr { value: decimal }
    };
    let argument = self.alloc(loc, argument);
    let call = self.call(loc, LIBRARY_NAMESPACE, "BigInt", vec![argument]);
    self.replace(node, call, "bigint literal");
  }

  fn lower_operator(
    &mut self,
    node: NodeId,
    classification: Classification,
    method: &str,
    operands: Vec<NodeId>,
  ) -> bool {
    let Some(target) = self.target(classification) else {
      return false;
    };
    let call = self.call(self.ast.loc(node), target, method, operands);
    self.replace(node, call, "operator");
    true
  }

  // `typeof x === "bigint"` becomes `x instanceof JSBI`, and `!==` its negation.
  fn lower_bigint_guard(&mut self, node: NodeId, operator: OperatorName, left: NodeId, right: NodeId) {
    if !self.guards.contains(left)
      || !matches!(self.ast.stx(right), Syntax::LitStr { value } if value == "bigint")
    {
      return;
    };
    let Syntax::Unary { argument, .. } = *self.ast.stx(left) else {
      return;
    };
    let loc = self.ast.loc(node);
    let instance_of = Syntax::Binary {
      operator: OperatorName::Instanceof,
      left: argument,
      right: self.id(loc, LIBRARY_NAMESPACE),
    };
    let replacement = if operator == OperatorName::StrictInequality {
      Syntax::Unary {
        operator: OperatorName::LogicalNot,
        argument: self.alloc(loc, instance_of),
      }
    } else {
      instance_of
    };
    self.replace(node, replacement, "typeof guard");
  }

  fn lower_call(&mut self, callee: NodeId, arguments: &[CallArg]) {
    let loc = self.ast.loc(callee);
    let static_method = match self.ast.stx(callee) {
      Syntax::Member { left, right, .. } if self.ast.stx(*left).id_name() == Some("BigInt") => {
        Some(right.clone())
      }
      _ => None,
    };
    let replacement = match (self.ast.stx(callee).id_name(), static_method.as_deref()) {
      (Some("Number"), _) => {
        let classification = match arguments.first() {
          Some(argument) => self.classify(argument.value),
          None => Classification::Native,
        };
        match self.target(classification) {
          Some(target) => self.member(loc, target, "toNumber"),
          None => return,
        }
      }
      (Some("BigInt"), _) => self.member(loc, LIBRARY_NAMESPACE, "BigInt"),
      (_, Some(method @ ("asUintN" | "asIntN"))) => self.member(loc, LIBRARY_NAMESPACE, method),
      _ => return,
    };
    self.replace(callee, replacement, "call");
  }

  // Literals and constant bindings can be evaluated twice.
  fn is_reusable(&self, operand: NodeId) -> bool {
    match self.ast.stx(operand) {
      Syntax::LitStr { .. } | Syntax::LitNum { .. } => true,
      Syntax::Id { .. } => self.bindings.lookup(operand).is_some_and(|b| b.constant),
      _ => false,
    }
  }

  /// Returns the nodes to use for writing and for reading `operand`. Operands that cannot be
  /// evaluated twice are first assigned to a temporary; that assignment is appended to `prefix`.
  fn reusable_operand(
    &mut self,
    assignment: NodeId,
    operand: NodeId,
    base: &str,
    prefix: &mut Vec<NodeId>,
  ) -> (NodeId, NodeId) {
    let loc = self.ast.loc(operand);
    if self.is_reusable(operand) {
      let read = self.ast.clone_subtree(operand);
      self.bindings.register_alias(operand, read);
      return (operand, read);
    };
    let temp = self.allocate_temp(assignment, base);
    let target = self.alloc(loc, Syntax::IdPat { name: temp.clone() });
    prefix.push(self.alloc(loc, Syntax::Binary {
      operator: OperatorName::Assignment,
      left: target,
      right: operand,
    }));
    (self.id(loc, &temp), self.id(loc, &temp))
  }

  // `x op= r` becomes `x = T.method(x, r)`; member targets evaluate their parts once.
  fn lower_compound_assignment(&mut self, node: NodeId, operator: OperatorName, left: NodeId, right: NodeId) {
    let Some(method) = operator.compound_operator().and_then(binary_function) else {
      return;
    };
    let classification = self.classify(node);
    let Some(target) = self.target(classification) else {
      return;
    };
    let loc = self.ast.loc(node);
    let left_loc = self.ast.loc(left);
    let mut prefix = Vec::new();
    let read = match self.ast.stx(left).clone() {
      Syntax::IdPat { name } => {
        let read = self.id(left_loc, &name);
        self.bindings.register_alias(left, read);
        read
      }
      Syntax::Member {
        optional_chaining,
        left: object,
        right: property,
      } => {
        let (write_object, read_object) = self.reusable_operand(node, object, "x", &mut prefix);
        self.ast.replace(left, Syntax::Member {
          optional_chaining,
          left: write_object,
          right: property.clone(),
        });
        self.alloc(left_loc, Syntax::Member {
          optional_chaining,
          left: read_object,
          right: property,
        })
      }
      Syntax::ComputedMember {
        optional_chaining,
        object,
        member,
      } => {
        let (write_object, read_object) = self.reusable_operand(node, object, "x", &mut prefix);
        let (write_member, read_member) = self.reusable_operand(node, member, "y", &mut prefix);
        self.ast.replace(left, Syntax::ComputedMember {
          optional_chaining,
          object: write_object,
          member: write_member,
        });
        self.alloc(left_loc, Syntax::ComputedMember {
          optional_chaining,
          object: read_object,
          member: read_member,
        })
      }
      _ => return,
    };
    let call = self.call(loc, target, method, vec![read, right]);
    let assignment = Syntax::Binary {
      operator: OperatorName::Assignment,
      left,
      right: self.alloc(loc, call),
    };
    self.replace_with_sequence(node, prefix, assignment);
  }

  // Replaces `node` with `(prefix..., last)`.
  fn replace_with_sequence(&mut self, node: NodeId, prefix: Vec<NodeId>, last: Syntax) {
    let loc = self.ast.loc(node);
    let mut acc = None;
    for expr in prefix {
      acc = Some(match acc {
        None => expr,
        Some(acc) => self.alloc(loc, Syntax::Binary {
          operator: OperatorName::Comma,
          left: acc,
          right: expr,
        }),
      });
    }
    let replacement = match acc {
      None => last,
      Some(acc) => Syntax::Binary {
        operator: OperatorName::Comma,
        left: acc,
        right: self.alloc(loc, last),
      },
    };
    self.replace(node, replacement, "compound assignment");
  }

  fn is_name_taken(&self, name: &str) -> bool {
    self.taken.contains(name) || self.bindings.is_name_used(name)
  }

  /// A fresh name (`_x`, `_x2`, `_x3`, ...) declared in the function or unit containing `node`.
  fn allocate_temp(&mut self, node: NodeId, base: &str) -> String {
    let owner = self
      .ast
      .ancestors(node)
      .find(|&a| matches!(self.ast.stx(a), Syntax::Function { .. }))
      .unwrap_or_else(|| self.ast.root());
    let mut name = format!("_{}", base);
    let mut suffix = 2;
    while self.is_name_taken(&name) {
      name = format!("_{}{}", base, suffix);
      suffix += 1;
    }
    self.taken.insert(name.clone());
    match self.temps.iter_mut().find(|(o, _)| *o == owner) {
      Some((_, names)) => names.push(name.clone()),
      None => self.temps.push((owner, vec![name.clone()])),
    };
    name
  }

  // `var _x, _y;` after the directives of each body that received temporaries.
  fn declare_temps(&mut self) {
    for (owner, names) in std::mem::take(&mut self.temps) {
      let loc = self.ast.loc(owner);
      let declarators = names
        .into_iter()
        .map(|name| {
          let pattern = self.alloc(loc, Syntax::IdPat { name });
          self.alloc(loc, Syntax::VarDeclarator {
            pattern,
            initializer: None,
          })
        })
        .collect();
      let decl = self.alloc(loc, Syntax::VarDecl {
        mode: VarDeclMode::Var,
        declarators,
      });
      let mut stx = self.ast.stx(owner).clone();
      match &mut stx {
        Syntax::TopLevel { body } | Syntax::Function {
          body: FuncBody::Block(body),
          ..
        } => {
          let at = directive_count(self.ast, body);
          body.insert(at, decl);
        }
        Syntax::Function { body, .. } => {
          if let FuncBody::Expression(expr) = *body {
            let ret = self.alloc(self.ast.loc(expr), Syntax::Return { value: Some(expr) });
            *body = FuncBody::Block(vec![decl, ret]);
          };
        }
        _ => continue,
      };
      debug!(target: "bigint_lower_js::rewrite", ?owner, "declared temporaries");
      self.ast.replace(owner, stx);
    }
  }
}
