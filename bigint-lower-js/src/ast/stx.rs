use super::NodeId;
use crate::operator::OperatorName;
use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum VarDeclMode {
  Const,
  Let,
  Var,
}

impl VarDeclMode {
  pub fn keyword(self) -> &'static str {
    match self {
      VarDeclMode::Const => "const",
      VarDeclMode::Let => "let",
      VarDeclMode::Var => "var",
    }
  }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum FuncKind {
  Declaration,
  Expression,
  Arrow,
  // Body of an object or class method; the key lives on the member.
  Method,
}

#[derive(Clone, Debug, Serialize)]
pub enum FuncBody {
  Block(Vec<NodeId>),
  // Concise arrow body.
  Expression(NodeId),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum MethodKind {
  Method,
  Getter,
  Setter,
}

/// A property name. Direct keys keep their source text, so quoted and numeric keys round trip.
#[derive(Clone, Debug, Serialize)]
pub enum PropKey {
  Direct(String),
  Computed(NodeId),
}

#[derive(Clone, Debug, Serialize)]
pub enum ObjMember {
  Prop { key: PropKey, value: NodeId },
  // `{a}`; `name` is an `Id` node.
  Shorthand { name: NodeId },
  Method { key: PropKey, kind: MethodKind, func: NodeId },
  Spread { value: NodeId },
}

#[derive(Clone, Debug, Serialize)]
pub enum ClassMemberValue {
  Method { kind: MethodKind, func: NodeId },
  Field { initializer: Option<NodeId> },
}

#[derive(Clone, Debug, Serialize)]
pub enum ArrElem {
  Single(NodeId),
  Spread(NodeId),
  Empty,
}

#[derive(Clone, Debug, Serialize)]
pub struct CallArg {
  pub spread: bool,
  pub value: NodeId,
}

#[derive(Clone, Debug, Serialize)]
pub enum TemplatePart {
  // Raw source text between substitutions.
  String(String),
  Substitution(NodeId),
}

#[derive(Clone, Debug, Serialize)]
pub struct PatElem {
  pub target: NodeId,
  pub default_value: Option<NodeId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ObjPatProp {
  pub key: PropKey,
  pub target: NodeId,
  pub shorthand: bool,
  pub default_value: Option<NodeId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportName {
  pub imported: String,
  // An `IdPat` node.
  pub local: NodeId,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportName {
  pub local: String,
  pub exported: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub enum Syntax {
  TopLevel { body: Vec<NodeId> },

  // Statements.
  Block { body: Vec<NodeId> },
  Break { label: Option<String> },
  CatchBlock { parameter: Option<NodeId>, body: NodeId },
  Continue { label: Option<String> },
  Debugger,
  DoWhile { condition: NodeId, body: NodeId },
  Empty,
  // `export default <expr>;`
  ExportDefaultExpr { expression: NodeId },
  // `export [default] <function|class|var>`
  ExportDecl { default: bool, declaration: NodeId },
  ExportList { names: Vec<ExportName>, from: Option<String> },
  ExprStmt { expression: NodeId },
  // `lhs` is a `VarDecl` with a single declarator, or an assignment pattern.
  ForInOf { of: bool, await_: bool, lhs: NodeId, rhs: NodeId, body: NodeId },
  // `init` is a `VarDecl` or an expression.
  ForTriple { init: Option<NodeId>, condition: Option<NodeId>, post: Option<NodeId>, body: NodeId },
  If { test: NodeId, consequent: NodeId, alternate: Option<NodeId> },
  Import { default: Option<NodeId>, namespace: Option<NodeId>, named: Vec<ImportName>, module: String },
  Label { name: String, statement: NodeId },
  Return { value: Option<NodeId> },
  Switch { test: NodeId, branches: Vec<NodeId> },
  SwitchBranch { case: Option<NodeId>, body: Vec<NodeId> },
  Throw { value: NodeId },
  Try { wrapped: NodeId, catch: Option<NodeId>, finally: Option<NodeId> },
  VarDecl { mode: VarDeclMode, declarators: Vec<NodeId> },
  VarDeclarator { pattern: NodeId, initializer: Option<NodeId> },
  While { condition: NodeId, body: NodeId },

  // Functions and classes; `name` is an `IdPat`.
  Function { kind: FuncKind, name: Option<NodeId>, async_: bool, generator: bool, params: Vec<NodeId>, body: FuncBody },
  ParamDecl { rest: bool, pattern: NodeId, default_value: Option<NodeId> },
  Class { declaration: bool, name: Option<NodeId>, extends: Option<NodeId>, members: Vec<NodeId> },
  ClassMember { static_: bool, key: PropKey, value: ClassMemberValue },

  // Patterns.
  IdPat { name: String },
  ArrPat { elements: Vec<Option<PatElem>>, rest: Option<NodeId> },
  ObjPat { properties: Vec<ObjPatProp>, rest: Option<NodeId> },

  // Expressions.
  Id { name: String },
  This,
  Super,
  LitArr { elements: Vec<ArrElem> },
  // Digits as written, without the `n` suffix.
  LitBigInt { value: String },
  LitBool { value: bool },
  LitNull,
  LitNum { value: String },
  LitObj { members: Vec<NodeId> },
  ObjMember(ObjMember),
  LitRegex { value: String },
  // Decoded value.
  LitStr { value: String },
  LitTemplate { parts: Vec<TemplatePart> },
  TaggedTemplate { function: NodeId, parts: Vec<TemplatePart> },
  Unary { operator: OperatorName, argument: NodeId },
  UnaryPostfix { operator: OperatorName, argument: NodeId },
  // Includes assignments, logical operators and the comma operator.
  Binary { operator: OperatorName, left: NodeId, right: NodeId },
  Cond { test: NodeId, consequent: NodeId, alternate: NodeId },
  Call { optional_chaining: bool, callee: NodeId, arguments: Vec<CallArg> },
  New { callee: NodeId, arguments: Vec<CallArg> },
  Member { optional_chaining: bool, left: NodeId, right: String },
  ComputedMember { optional_chaining: bool, object: NodeId, member: NodeId },
}

fn push_key(out: &mut Vec<NodeId>, key: &PropKey) {
  if let PropKey::Computed(id) = key {
    out.push(*id);
  }
}

fn push_parts(out: &mut Vec<NodeId>, parts: &[TemplatePart]) {
  for part in parts {
    if let TemplatePart::Substitution(id) = part {
      out.push(*id);
    }
  }
}

impl Syntax {
  /// Direct children in evaluation order.
  pub fn children(&self) -> Vec<NodeId> {
    let mut out = Vec::new();
    match self {
      Syntax::TopLevel { body } | Syntax::Block { body } => out.extend(body.iter().copied()),
      Syntax::Break { .. }
      | Syntax::Continue { .. }
      | Syntax::Debugger
      | Syntax::Empty
      | Syntax::ExportList { .. }
      | Syntax::IdPat { .. }
      | Syntax::Id { .. }
      | Syntax::This
      | Syntax::Super
      | Syntax::LitBigInt { .. }
      | Syntax::LitBool { .. }
      | Syntax::LitNull
      | Syntax::LitNum { .. }
      | Syntax::LitRegex { .. }
      | Syntax::LitStr { .. } => {}
      Syntax::CatchBlock { parameter, body } => {
        out.extend(*parameter);
        out.push(*body);
      }
      Syntax::DoWhile { condition, body } => {
        out.push(*body);
        out.push(*condition);
      }
      Syntax::ExportDefaultExpr { expression } | Syntax::ExprStmt { expression } => {
        out.push(*expression)
      }
      Syntax::ExportDecl { declaration, .. } => out.push(*declaration),
      Syntax::ForInOf { lhs, rhs, body, .. } => out.extend([*lhs, *rhs, *body]),
      Syntax::ForTriple {
        init,
        condition,
        post,
        body,
      } => {
        out.extend(*init);
        out.extend(*condition);
        out.extend(*post);
        out.push(*body);
      }
      Syntax::If {
        test,
        consequent,
        alternate,
      } => {
        out.push(*test);
        out.push(*consequent);
        out.extend(*alternate);
      }
      Syntax::Import {
        default,
        namespace,
        named,
        ..
      } => {
        out.extend(*default);
        out.extend(*namespace);
        out.extend(named.iter().map(|n| n.local));
      }
      Syntax::Label { statement, .. } => out.push(*statement),
      Syntax::Return { value } => out.extend(*value),
      Syntax::Switch { test, branches } => {
        out.push(*test);
        out.extend(branches.iter().copied());
      }
      Syntax::SwitchBranch { case, body } => {
        out.extend(*case);
        out.extend(body.iter().copied());
      }
      Syntax::Throw { value } => out.push(*value),
      Syntax::Try {
        wrapped,
        catch,
        finally,
      } => {
        out.push(*wrapped);
        out.extend(*catch);
        out.extend(*finally);
      }
      Syntax::VarDecl { declarators, .. } => out.extend(declarators.iter().copied()),
      Syntax::VarDeclarator {
        pattern,
        initializer,
      } => {
        out.push(*pattern);
        out.extend(*initializer);
      }
      Syntax::While { condition, body } => out.extend([*condition, *body]),
      Syntax::Function {
        name, params, body, ..
      } => {
        out.extend(*name);
        out.extend(params.iter().copied());
        match body {
          FuncBody::Block(stmts) => out.extend(stmts.iter().copied()),
          FuncBody::Expression(expr) => out.push(*expr),
        };
      }
      Syntax::ParamDecl {
        pattern,
        default_value,
        ..
      } => {
        out.push(*pattern);
        out.extend(*default_value);
      }
      Syntax::Class {
        name,
        extends,
        members,
        ..
      } => {
        out.extend(*name);
        out.extend(*extends);
        out.extend(members.iter().copied());
      }
      Syntax::ClassMember { key, value, .. } => {
        push_key(&mut out, key);
        match value {
          ClassMemberValue::Method { func, .. } => out.push(*func),
          ClassMemberValue::Field { initializer } => out.extend(*initializer),
        };
      }
      Syntax::ArrPat { elements, rest } => {
        for elem in elements.iter().flatten() {
          out.push(elem.target);
          out.extend(elem.default_value);
        }
        out.extend(*rest);
      }
      Syntax::ObjPat { properties, rest } => {
        for prop in properties {
          push_key(&mut out, &prop.key);
          out.push(prop.target);
          out.extend(prop.default_value);
        }
        out.extend(*rest);
      }
      Syntax::LitArr { elements } => {
        for elem in elements {
          match elem {
            ArrElem::Single(id) | ArrElem::Spread(id) => out.push(*id),
            ArrElem::Empty => {}
          };
        }
      }
      Syntax::LitObj { members } => out.extend(members.iter().copied()),
      Syntax::ObjMember(member) => match member {
        ObjMember::Prop { key, value } => {
          push_key(&mut out, key);
          out.push(*value);
        }
        ObjMember::Shorthand { name } => out.push(*name),
        ObjMember::Method { key, func, .. } => {
          push_key(&mut out, key);
          out.push(*func);
        }
        ObjMember::Spread { value } => out.push(*value),
      },
      Syntax::LitTemplate { parts } => push_parts(&mut out, parts),
      Syntax::TaggedTemplate { function, parts } => {
        out.push(*function);
        push_parts(&mut out, parts);
      }
      Syntax::Unary { argument, .. } | Syntax::UnaryPostfix { argument, .. } => out.push(*argument),
      Syntax::Binary { left, right, .. } => out.extend([*left, *right]),
      Syntax::Cond {
        test,
        consequent,
        alternate,
      } => out.extend([*test, *consequent, *alternate]),
      Syntax::Call {
        callee, arguments, ..
      }
      | Syntax::New { callee, arguments } => {
        out.push(*callee);
        out.extend(arguments.iter().map(|a| a.value));
      }
      Syntax::Member { left, .. } => out.push(*left),
      Syntax::ComputedMember { object, member, .. } => out.extend([*object, *member]),
    };
    out
  }

  /// Rewrites every child reference, keeping the shape. Used when cloning subtrees.
  pub fn map_children(&self, f: &mut impl FnMut(NodeId) -> NodeId) -> Syntax {
    let mut stx = self.clone();
    stx.for_each_child_mut(&mut |id| *id = f(*id));
    stx
  }

  fn for_each_child_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
    fn key(k: &mut PropKey, f: &mut impl FnMut(&mut NodeId)) {
      if let PropKey::Computed(id) = k {
        f(id);
      }
    }
    fn parts(p: &mut [TemplatePart], f: &mut impl FnMut(&mut NodeId)) {
      for part in p {
        if let TemplatePart::Substitution(id) = part {
          f(id);
        }
      }
    }
    fn opt(o: &mut Option<NodeId>, f: &mut impl FnMut(&mut NodeId)) {
      if let Some(id) = o {
        f(id);
      }
    }
    match self {
      Syntax::TopLevel { body } | Syntax::Block { body } => body.iter_mut().for_each(f),
      Syntax::Break { .. }
      | Syntax::Continue { .. }
      | Syntax::Debugger
      | Syntax::Empty
      | Syntax::ExportList { .. }
      | Syntax::IdPat { .. }
      | Syntax::Id { .. }
      | Syntax::This
      | Syntax::Super
      | Syntax::LitBigInt { .. }
      | Syntax::LitBool { .. }
      | Syntax::LitNull
      | Syntax::LitNum { .. }
      | Syntax::LitRegex { .. }
      | Syntax::LitStr { .. } => {}
      Syntax::CatchBlock { parameter, body } => {
        opt(parameter, f);
        f(body);
      }
      Syntax::DoWhile { condition, body } => {
        f(body);
        f(condition);
      }
      Syntax::ExportDefaultExpr { expression } | Syntax::ExprStmt { expression } => f(expression),
      Syntax::ExportDecl { declaration, .. } => f(declaration),
      Syntax::ForInOf { lhs, rhs, body, .. } => {
        f(lhs);
        f(rhs);
        f(body);
      }
      Syntax::ForTriple {
        init,
        condition,
        post,
        body,
      } => {
        opt(init, f);
        opt(condition, f);
        opt(post, f);
        f(body);
      }
      Syntax::If {
        test,
        consequent,
        alternate,
      } => {
        f(test);
        f(consequent);
        opt(alternate, f);
      }
      Syntax::Import {
        default,
        namespace,
        named,
        ..
      } => {
        opt(default, f);
        opt(namespace, f);
        named.iter_mut().for_each(|n| f(&mut n.local));
      }
      Syntax::Label { statement, .. } => f(statement),
      Syntax::Return { value } => opt(value, f),
      Syntax::Switch { test, branches } => {
        f(test);
        branches.iter_mut().for_each(f);
      }
      Syntax::SwitchBranch { case, body } => {
        opt(case, f);
        body.iter_mut().for_each(f);
      }
      Syntax::Throw { value } => f(value),
      Syntax::Try {
        wrapped,
        catch,
        finally,
      } => {
        f(wrapped);
        opt(catch, f);
        opt(finally, f);
      }
      Syntax::VarDecl { declarators, .. } => declarators.iter_mut().for_each(f),
      Syntax::VarDeclarator {
        pattern,
        initializer,
      } => {
        f(pattern);
        opt(initializer, f);
      }
      Syntax::While { condition, body } => {
        f(condition);
        f(body);
      }
      Syntax::Function {
        name, params, body, ..
      } => {
        opt(name, f);
        params.iter_mut().for_each(&mut *f);
        match body {
          FuncBody::Block(stmts) => stmts.iter_mut().for_each(f),
          FuncBody::Expression(expr) => f(expr),
        };
      }
      Syntax::ParamDecl {
        pattern,
        default_value,
        ..
      } => {
        f(pattern);
        opt(default_value, f);
      }
      Syntax::Class {
        name,
        extends,
        members,
        ..
      } => {
        opt(name, f);
        opt(extends, f);
        members.iter_mut().for_each(f);
      }
      Syntax::ClassMember { key: k, value, .. } => {
        key(k, f);
        match value {
          ClassMemberValue::Method { func, .. } => f(func),
          ClassMemberValue::Field { initializer } => opt(initializer, f),
        };
      }
      Syntax::ArrPat { elements, rest } => {
        for elem in elements.iter_mut().flatten() {
          f(&mut elem.target);
          opt(&mut elem.default_value, f);
        }
        opt(rest, f);
      }
      Syntax::ObjPat { properties, rest } => {
        for prop in properties.iter_mut() {
          key(&mut prop.key, f);
          f(&mut prop.target);
          opt(&mut prop.default_value, f);
        }
        opt(rest, f);
      }
      Syntax::LitArr { elements } => {
        for elem in elements.iter_mut() {
          match elem {
            ArrElem::Single(id) | ArrElem::Spread(id) => f(id),
            ArrElem::Empty => {}
          };
        }
      }
      Syntax::LitObj { members } => members.iter_mut().for_each(f),
      Syntax::ObjMember(member) => match member {
        ObjMember::Prop { key: k, value } => {
          key(k, f);
          f(value);
        }
        ObjMember::Shorthand { name } => f(name),
        ObjMember::Method { key: k, func, .. } => {
          key(k, f);
          f(func);
        }
        ObjMember::Spread { value } => f(value),
      },
      Syntax::LitTemplate { parts: p } => parts(p, f),
      Syntax::TaggedTemplate { function, parts: p } => {
        f(function);
        parts(p, f);
      }
      Syntax::Unary { argument, .. } | Syntax::UnaryPostfix { argument, .. } => f(argument),
      Syntax::Binary { left, right, .. } => {
        f(left);
        f(right);
      }
      Syntax::Cond {
        test,
        consequent,
        alternate,
      } => {
        f(test);
        f(consequent);
        f(alternate);
      }
      Syntax::Call {
        callee, arguments, ..
      }
      | Syntax::New { callee, arguments } => {
        f(callee);
        arguments.iter_mut().for_each(|a| f(&mut a.value));
      }
      Syntax::Member { left, .. } => f(left),
      Syntax::ComputedMember { object, member, .. } => {
        f(object);
        f(member);
      }
    };
  }

  pub fn is_function(&self) -> bool {
    matches!(self, Syntax::Function { .. })
  }

  pub fn id_name(&self) -> Option<&str> {
    match self {
      Syntax::Id { name } | Syntax::IdPat { name } => Some(name),
      _ => None,
    }
  }
}
