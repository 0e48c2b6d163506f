//! Three-valued classification of expressions: definitely a BigInt, definitely a native value, or
//! undetermined.
//!
//! Results are memoized per pass in a [`MemoTable`]. A node whose classification is being computed
//! is marked in progress; reading it again (a cycle) yields [`Classification::Unknown`], which the
//! meet treats as neutral, so cycles are resolved optimistically. `Unknown` results are never
//! cached because they may only reflect such a pending dependency.
//!
//! Bindings with several assignment sites are settled by a speculative hypothesis
//! ([`ClassifyPass::try_hypothesis`]): assume the binding has the candidate classification, re-check
//! every assignment, and keep the assumption only if all of them agree.

use crate::ast::stx::FuncBody;
use crate::ast::stx::FuncKind;
use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::FileId;
use crate::operator::OperatorName;
use crate::symbol::Binding;
use crate::symbol::Bindings;
use crate::symbol::DeclKind;
use crate::DISPATCH_SHIM_NAMESPACE;
use crate::LIBRARY_NAMESPACE;
use ahash::HashMap;
use ahash::HashSet;
use serde_json::Value;
use tracing::debug;
use tracing::trace;

pub mod guard;

/// Diagnostic code for expressions the classifier does not understand.
pub const UNCLASSIFIABLE_CODE: &str = "BL0001";

// Library methods whose result is not a BigInt.
const NATIVE_RESULT_METHODS: &[&str] = &[
  "toNumber",
  "lessThan",
  "greaterThan",
  "lessThanOrEqual",
  "greaterThanOrEqual",
  "equal",
  "notEqual",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
  BigInt,
  Native,
  Unknown,
}

impl Classification {
  /// `Unknown` is neutral; two BigInts stay a BigInt; any other mix is native, since mixing a
  /// BigInt with a native value throws instead of producing a BigInt.
  pub fn meet(self, other: Classification) -> Classification {
    match (self, other) {
      (Classification::Unknown, x) | (x, Classification::Unknown) => x,
      (Classification::BigInt, Classification::BigInt) => Classification::BigInt,
      _ => Classification::Native,
    }
  }

  pub fn is_resolved(self) -> bool {
    self != Classification::Unknown
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoEntry {
  InProgress,
  Resolved(Classification),
}

#[derive(Clone, Debug, Default)]
pub struct MemoTable {
  entries: HashMap<NodeId, MemoEntry>,
}

impl MemoTable {
  pub fn get(&self, node: NodeId) -> Option<MemoEntry> {
    self.entries.get(&node).copied()
  }

  pub fn is_in_progress(&self, node: NodeId) -> bool {
    self.get(node) == Some(MemoEntry::InProgress)
  }

  pub fn begin(&mut self, node: NodeId) {
    self.entries.insert(node, MemoEntry::InProgress);
  }

  /// Records a result, or forgets the node when the result is `Unknown`.
  pub fn finish(&mut self, node: NodeId, result: Classification) {
    if result.is_resolved() {
      self.entries.insert(node, MemoEntry::Resolved(result));
    } else {
      self.entries.remove(&node);
    }
  }

  pub fn purge_in_progress(&mut self) {
    self.entries.retain(|_, e| *e != MemoEntry::InProgress);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Per-pass classifier state. The tree and bindings are passed to each query because the rewriter
/// mutates them between queries.
pub struct Classifier {
  memo: MemoTable,
  diagnostics: Vec<Diagnostic>,
  warned: HashSet<NodeId>,
  file: FileId,
}

impl Classifier {
  pub fn new(file: FileId) -> Classifier {
    Classifier {
      memo: MemoTable::default(),
      diagnostics: Vec::new(),
      warned: HashSet::default(),
      file,
    }
  }

  pub fn classify(&mut self, ast: &Ast, bindings: &Bindings, node: NodeId) -> Classification {
    ClassifyPass {
      ast,
      bindings,
      state: self,
    }
    .classify(node)
  }

  pub fn memo(&self) -> &MemoTable {
    &self.memo
  }

  pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
    std::mem::take(&mut self.diagnostics)
  }
}

fn kind_name(stx: &Syntax) -> String {
  match serde_json::to_value(stx) {
    Ok(Value::String(name)) => name,
    Ok(Value::Object(map)) => map.keys().next().cloned().unwrap_or_default(),
    _ => String::new(),
  }
}

fn is_member_of(ast: &Ast, node: NodeId, object: &str) -> Option<String> {
  match ast.stx(node) {
    Syntax::Member { left, right, .. } if ast.stx(*left).id_name() == Some(object) => {
      Some(right.clone())
    }
    _ => None,
  }
}

/// The `return` values of a function's own body; nested functions are not searched. `None` marks a
/// bare `return;`.
fn own_returns(ast: &Ast, func: NodeId) -> Vec<Option<NodeId>> {
  let Syntax::Function { body, .. } = ast.stx(func) else {
    return Vec::new();
  };
  let stmts = match body {
    FuncBody::Expression(expr) => return vec![Some(*expr)],
    FuncBody::Block(stmts) => stmts,
  };
  let mut out = Vec::new();
  let mut worklist: Vec<NodeId> = stmts.iter().rev().copied().collect();
  while let Some(node) = worklist.pop() {
    match ast.stx(node) {
      Syntax::Return { value } => out.push(*value),
      Syntax::Function { .. } | Syntax::Class { .. } => {}
      stx => worklist.extend(stx.children().into_iter().rev()),
    };
  }
  out
}

pub struct ClassifyPass<'a> {
  ast: &'a Ast,
  bindings: &'a Bindings,
  state: &'a mut Classifier,
}

impl<'a> ClassifyPass<'a> {
  pub fn classify(&mut self, node: NodeId) -> Classification {
    match self.state.memo.get(node) {
      Some(MemoEntry::InProgress) => {
        trace!(target: "bigint_lower_js::classify", in_progress = true, ?node);
        return Classification::Unknown;
      }
      Some(MemoEntry::Resolved(result)) => {
        trace!(target: "bigint_lower_js::classify", cache_hit = true, ?node, ?result);
        return result;
      }
      None => {}
    };
    self.state.memo.begin(node);
    let result = self.compute(node);
    self.state.memo.finish(node, result);
    trace!(target: "bigint_lower_js::classify", cache_hit = false, ?node, ?result);
    result
  }

  fn unclassifiable(&mut self, node: NodeId) -> Classification {
    if self.state.warned.insert(node) {
      let kind = kind_name(self.ast.stx(node));
      debug!(target: "bigint_lower_js::classify", ?node, kind = %kind, "unclassifiable syntax");
      self.state.diagnostics.push(
        Diagnostic::warning(
          UNCLASSIFIABLE_CODE,
          format!("cannot classify `{}` syntax; it is treated as possibly a BigInt", kind),
          self.ast.loc(node).to_span(self.state.file),
        )
        .with_note("operators applied to it are routed through the runtime dispatch shim"),
      );
    };
    Classification::Unknown
  }

  // Single argument of a `Math.<name>(...)` call.
  fn is_math_argument(&self, node: NodeId) -> bool {
    let Some(parent) = self.ast.parent(node) else {
      return false;
    };
    match self.ast.stx(parent) {
      Syntax::Call {
        callee, arguments, ..
      } => {
        arguments.len() == 1
          && arguments[0].value == node
          && is_member_of(self.ast, *callee, "Math").is_some()
      }
      _ => false,
    }
  }

  fn compute(&mut self, node: NodeId) -> Classification {
    use Classification::*;
    let ast = self.ast;
    match ast.stx(node) {
      Syntax::LitBigInt { .. } => return BigInt,
      Syntax::LitNum { .. }
      | Syntax::LitStr { .. }
      | Syntax::LitNull
      | Syntax::LitRegex { .. }
      | Syntax::LitBool { .. }
      | Syntax::LitTemplate { .. } => return Native,
      _ => {}
    };
    if self.is_math_argument(node) {
      return Native;
    };
    match ast.stx(node) {
      Syntax::Unary { operator, argument } => match operator {
        // `+0n` throws, so unary plus never yields a BigInt.
        OperatorName::UnaryPlus => Native,
        OperatorName::Await | OperatorName::Yield | OperatorName::YieldDelegated => Unknown,
        _ => self.classify(*argument),
      },
      Syntax::UnaryPostfix { argument, .. } => self.classify(*argument),
      Syntax::Binary {
        operator,
        left,
        right,
      } => self.classify_binary(*operator, *left, *right),
      Syntax::Cond {
        consequent,
        alternate,
        ..
      } => {
        let a = self.classify(*consequent);
        let b = self.classify(*alternate);
        if a == b {
          a
        } else {
          Unknown
        }
      }
      Syntax::Id { .. } | Syntax::IdPat { .. } => self.classify_identifier(node),
      Syntax::Call { .. } => self.classify_call(node),
      Syntax::LitObj { .. }
      | Syntax::LitArr { .. }
      | Syntax::ObjMember(_)
      | Syntax::New { .. }
      | Syntax::Function { .. }
      | Syntax::Class { .. } => Native,
      Syntax::Member { .. }
      | Syntax::ComputedMember { .. }
      | Syntax::TaggedTemplate { .. }
      | Syntax::ArrPat { .. }
      | Syntax::ObjPat { .. }
      | Syntax::ForInOf { .. } => Unknown,
      // Redeclarations of a `var`.
      Syntax::VarDeclarator { initializer, .. } => match initializer {
        Some(initializer) => self.classify(*initializer),
        None => Unknown,
      },
      _ => self.unclassifiable(node),
    }
  }

  fn classify_binary(&mut self, operator: OperatorName, left: NodeId, right: NodeId) -> Classification {
    use Classification::*;
    let ast = self.ast;
    if operator.is_assignment() {
      if matches!(ast.stx(left), Syntax::ArrPat { .. } | Syntax::ObjPat { .. }) {
        return Unknown;
      };
      if operator == OperatorName::Assignment {
        return self.classify(right);
      };
      let target = self.classify(left);
      return target.meet(self.classify(right));
    };
    match operator {
      OperatorName::LessThan
      | OperatorName::LessThanOrEqual
      | OperatorName::GreaterThan
      | OperatorName::GreaterThanOrEqual
      | OperatorName::StrictEquality
      | OperatorName::StrictInequality
      | OperatorName::Equality
      | OperatorName::Inequality
      | OperatorName::In
      | OperatorName::Instanceof
      | OperatorName::LogicalAnd
      | OperatorName::LogicalOr
      | OperatorName::NullishCoalescing => Native,
      OperatorName::Comma => self.classify(right),
      _ => {
        let l = self.classify(left);
        l.meet(self.classify(right))
      }
    }
  }

  fn classify_call(&mut self, node: NodeId) -> Classification {
    use Classification::*;
    let ast = self.ast;
    let Syntax::Call { callee, .. } = ast.stx(node) else {
      return Unknown;
    };
    let callee = *callee;
    if is_member_of(ast, callee, "Math").is_some() {
      return Native;
    };
    match ast.stx(callee).id_name() {
      Some("Number" | "String" | "Boolean") => return Native,
      Some("BigInt") => return BigInt,
      _ => {}
    };
    if let Some(method) = is_member_of(ast, callee, LIBRARY_NAMESPACE) {
      return if NATIVE_RESULT_METHODS.contains(&method.as_str()) {
        Native
      } else {
        BigInt
      };
    };
    if is_member_of(ast, callee, "BigInt").is_some() {
      return BigInt;
    };
    // Calls left behind by an earlier rewrite.
    if let Some(method) = is_member_of(ast, callee, DISPATCH_SHIM_NAMESPACE) {
      return if NATIVE_RESULT_METHODS.contains(&method.as_str()) {
        Native
      } else {
        Unknown
      };
    };
    match self.local_function(callee) {
      Some(func) => self.classify_returns(func),
      None => Unknown,
    }
  }

  /// The function literal an identifier callee is bound to, if any.
  fn local_function(&self, callee: NodeId) -> Option<NodeId> {
    let ast = self.ast;
    let binding = self.bindings.lookup(callee)?;
    match (binding.kind, ast.stx(binding.decl)) {
      (DeclKind::Function | DeclKind::FunctionExpressionName, Syntax::Function { .. }) => {
        Some(binding.decl)
      }
      (
        _,
        Syntax::VarDeclarator {
          pattern,
          initializer: Some(init),
        },
      ) if binding.constant && *pattern == binding.ident => match ast.stx(*init) {
        Syntax::Function {
          kind: FuncKind::Expression | FuncKind::Arrow,
          ..
        } => Some(*init),
        _ => None,
      },
      _ => None,
    }
  }

  fn classify_returns(&mut self, func: NodeId) -> Classification {
    let mut result = None;
    for value in own_returns(self.ast, func) {
      let c = match value {
        Some(value) => self.classify(value),
        None => Classification::Native,
      };
      if !c.is_resolved() || result.is_some_and(|r| r != c) {
        return Classification::Unknown;
      };
      result = Some(c);
    }
    result.unwrap_or(Classification::Unknown)
  }

  fn classify_identifier(&mut self, node: NodeId) -> Classification {
    use Classification::*;
    let ast = self.ast;
    let bindings = self.bindings;
    let name = ast.stx(node).id_name().unwrap_or_default();
    let Some(symbol) = bindings.binding_of(node) else {
      return if name == "undefined" { Native } else { Unknown };
    };
    let binding = bindings.binding(symbol);

    if let Syntax::VarDeclarator {
      pattern,
      initializer: Some(init),
    } = ast.stx(binding.decl)
    {
      if *pattern == binding.ident && !matches!(ast.stx(*init), Syntax::LitArr { .. }) {
        let x = self.classify(*init);
        if self.try_hypothesis(x, binding, node) {
          return x;
        };
      };
    };

    if let Some(c) = self.classify_from_call_sites(binding) {
      return c;
    };

    if binding.constant {
      if let Some(if_node) = guard::narrowing_if(ast, node) {
        if let Syntax::If { test, .. } = ast.stx(if_node) {
          if let Syntax::Binary {
            operator: OperatorName::LogicalAnd,
            left,
            right,
          } = ast.stx(*test)
          {
            if guard::is_typeof_check(ast, *left, name, "number", false)
              || guard::is_typeof_check(ast, *right, name, "number", false)
            {
              return Native;
            };
          };
        };
      };
    };

    if let Some(test) = self.parameter_guard(binding) {
      if guard::is_negated_check(ast, test, name, "bigint") && self.try_hypothesis(BigInt, binding, node) {
        return BigInt;
      };
      if guard::is_negated_check(ast, test, name, "number") && self.try_hypothesis(Native, binding, node) {
        return Native;
      };
    };

    if !binding.constant {
      let mut has_native = false;
      let mut has_bigint = false;
      for &violation in &binding.violations {
        match self.classify(violation) {
          Native => has_native = true,
          BigInt => has_bigint = true,
          Unknown => {}
        };
      }
      if has_native && !has_bigint && self.try_hypothesis(Native, binding, node) {
        return Native;
      };
      if has_bigint && !has_native && self.try_hypothesis(BigInt, binding, node) {
        return BigInt;
      };
    };

    Unknown
  }

  // A plain (identifier, no default, no rest) parameter: its position and function.
  fn plain_parameter(&self, binding: &Binding) -> Option<(usize, NodeId)> {
    let ast = self.ast;
    if binding.kind != DeclKind::Param {
      return None;
    };
    let Syntax::ParamDecl {
      rest: false,
      pattern,
      default_value: None,
    } = ast.stx(binding.decl)
    else {
      return None;
    };
    if *pattern != binding.ident {
      return None;
    };
    let func = ast.parent(binding.decl)?;
    let Syntax::Function { params, .. } = ast.stx(func) else {
      return None;
    };
    let position = params.iter().position(|&p| p == binding.decl)?;
    Some((position, func))
  }

  /// Folds the arguments passed for a parameter of a function declaration over all of its call
  /// sites. Any use of the function other than a direct call disqualifies the analysis.
  fn classify_from_call_sites(&mut self, binding: &Binding) -> Option<Classification> {
    let ast = self.ast;
    let (position, func) = self.plain_parameter(binding)?;
    let Syntax::Function {
      kind: FuncKind::Declaration,
      name: Some(name),
      ..
    } = ast.stx(func)
    else {
      return None;
    };
    let bindings = self.bindings;
    let function = bindings.lookup(*name)?;
    if function.exported {
      return None;
    };
    let mut folded = None;
    for &reference in &function.references {
      let call = ast.parent(reference)?;
      let Syntax::Call {
        callee, arguments, ..
      } = ast.stx(call)
      else {
        return None;
      };
      if *callee != reference || arguments.iter().take(position + 1).any(|a| a.spread) {
        return None;
      };
      let argument = arguments.get(position)?.value;
      let c = self.classify(argument);
      if !c.is_resolved() || folded.is_some_and(|f| f != c) {
        return None;
      };
      folded = Some(c);
    }
    folded
  }

  // The negated test of a leading `if (...) throw` in the function declaring a plain parameter,
  // when every parameter of that function is a plain identifier.
  fn parameter_guard(&self, binding: &Binding) -> Option<NodeId> {
    let ast = self.ast;
    let (_, func) = self.plain_parameter(binding)?;
    let Syntax::Function { params, .. } = ast.stx(func) else {
      return None;
    };
    let all_plain = params.iter().all(|&p| {
      matches!(
        ast.stx(p),
        Syntax::ParamDecl { rest: false, pattern, default_value: None }
          if matches!(ast.stx(*pattern), Syntax::IdPat { .. })
      )
    });
    if !all_plain {
      return None;
    };
    guard::leading_throw_guard(ast, func)
  }

  fn all_violations_are(&mut self, binding: &Binding, x: Classification) -> bool {
    binding.violations.iter().all(|&v| self.classify(v) == x)
  }

  /// Accepts `x` as the classification of the read `node` of `binding` if the binding is constant
  /// or every assignment to it agrees. If the read is itself still being computed, retries once
  /// assuming the read is `x`, with every other pending entry forgotten; the table is rolled back
  /// if the retry fails.
  pub fn try_hypothesis(&mut self, x: Classification, binding: &Binding, node: NodeId) -> bool {
    if !x.is_resolved() {
      return false;
    };
    if binding.constant || self.all_violations_are(binding, x) {
      return true;
    };
    if !self.state.memo.is_in_progress(node) {
      return false;
    };
    let snapshot = self.state.memo.clone();
    self.state.memo.entries.insert(node, MemoEntry::Resolved(x));
    self.state.memo.purge_in_progress();
    if self.all_violations_are(binding, x) {
      debug!(target: "bigint_lower_js::classify", ?node, hypothesis = ?x, accepted = true);
      return true;
    };
    debug!(target: "bigint_lower_js::classify", ?node, hypothesis = ?x, accepted = false);
    self.state.memo = snapshot;
    false
  }
}
