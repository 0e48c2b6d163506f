use super::bind;
use super::Bindings;
use super::DeclKind;
use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::parse;

fn bound(code: &str) -> (Ast, Bindings) {
  let ast = parse(code).unwrap();
  let bindings = bind(&ast);
  (ast, bindings)
}

// Identifier reads named `name`, in source order.
fn reads(ast: &Ast, name: &str) -> Vec<NodeId> {
  ast
    .descendants(ast.root())
    .into_iter()
    .filter(|&n| matches!(ast.stx(n), Syntax::Id { name: n2 } if n2 == name))
    .collect()
}

fn decls(bindings: &Bindings, name: &str) -> Vec<DeclKind> {
  bindings
    .symbols()
    .filter(|(_, b)| b.name == name)
    .map(|(_, b)| b.kind)
    .collect()
}

#[test]
fn shadowing_prefers_inner_bindings() {
  let (ast, bindings) = bound("let a = 1; { let a = 2; a; } a;");
  assert_eq!(decls(&bindings, "a"), vec![DeclKind::Let, DeclKind::Let]);
  let uses = reads(&ast, "a");
  assert_eq!(uses.len(), 2);
  let inner = bindings.binding_of(uses[0]).unwrap();
  let outer = bindings.binding_of(uses[1]).unwrap();
  assert_ne!(inner, outer);
  assert_eq!(bindings.binding(outer).scope.raw(), 0);
}

#[test]
fn var_and_function_declarations_hoist() {
  let (ast, bindings) = bound("x; f(); { var x = 1; } function f() {}");
  let x = reads(&ast, "x")[0];
  let f = reads(&ast, "f")[0];
  assert_eq!(bindings.lookup(x).unwrap().kind, DeclKind::Var);
  assert_eq!(bindings.lookup(f).unwrap().kind, DeclKind::Function);
}

#[test]
fn unresolved_names_are_free() {
  let (ast, bindings) = bound("Math.floor(y);");
  assert!(bindings.binding_of(reads(&ast, "y")[0]).is_none());
  assert!(bindings.is_name_used("Math"));
  assert!(!bindings.is_name_used("_x"));
}

#[test]
fn assignments_are_violations() {
  let (ast, bindings) = bound("let a = 1; a = 2n; a += 3n; const b = a;");
  let a = bindings.lookup(reads(&ast, "a")[0]).unwrap();
  assert!(!a.constant);
  assert_eq!(a.violations.len(), 2);
  assert!(a
    .violations
    .iter()
    .all(|&v| matches!(ast.stx(v), Syntax::Binary { .. })));
  let (_, b) = bindings.symbols().find(|(_, b)| b.name == "b").unwrap();
  assert!(b.constant);
  assert_eq!(b.kind, DeclKind::Const);
}

#[test]
fn destructuring_and_loop_heads_are_violations() {
  let (_, bindings) = bound("let x, y; [x, x] = [1, 2]; for (y of ys) {} for (const z of zs) {}");
  let (_, x) = bindings.symbols().find(|(_, b)| b.name == "x").unwrap();
  assert_eq!(x.violations.len(), 1);
  let (_, y) = bindings.symbols().find(|(_, b)| b.name == "y").unwrap();
  assert_eq!(y.violations.len(), 1);
  let (_, z) = bindings.symbols().find(|(_, b)| b.name == "z").unwrap();
  assert!(z.constant);
}

#[test]
fn redeclaration_with_a_value_is_a_violation() {
  let (_, bindings) = bound("var v = 1; var v; var v = 2n;");
  assert_eq!(decls(&bindings, "v").len(), 1);
  let (_, v) = bindings.symbols().find(|(_, b)| b.name == "v").unwrap();
  assert_eq!(v.violations.len(), 1);
}

#[test]
fn parameters_know_their_function() {
  let (ast, bindings) = bound("function f(p, q = p) { return () => p; }");
  let uses = reads(&ast, "p");
  assert_eq!(uses.len(), 2);
  let symbol = bindings.binding_of(uses[1]).unwrap();
  assert_eq!(bindings.binding(symbol).kind, DeclKind::Param);
  assert_eq!(bindings.binding_of(uses[0]), Some(symbol));
  let func = bindings.declaring_function(&ast, symbol).unwrap();
  assert!(matches!(ast.stx(func), Syntax::Function { name: Some(_), .. }));
}

#[test]
fn named_function_expressions_bind_their_own_name() {
  let (ast, bindings) = bound("const g = function h() { return h; }; h;");
  let uses = reads(&ast, "h");
  assert_eq!(
    bindings.lookup(uses[0]).unwrap().kind,
    DeclKind::FunctionExpressionName
  );
  assert!(bindings.binding_of(uses[1]).is_none());
}

#[test]
fn exports_are_flagged() {
  let (_, bindings) = bound("function f() {} function g() {} export { f }; export const h = 1;");
  let exported: Vec<_> = bindings
    .symbols()
    .filter(|(_, b)| b.exported)
    .map(|(_, b)| b.name.clone())
    .collect();
  assert_eq!(exported, vec!["f".to_string(), "h".to_string()]);
}

#[test]
fn aliases_count_as_references() {
  let (mut ast, mut bindings) = bound("let a = 1n; a;");
  let original = reads(&ast, "a")[0];
  let copy = ast.clone_subtree(original);
  bindings.register_alias(original, copy);
  let symbol = bindings.binding_of(original).unwrap();
  assert_eq!(bindings.binding_of(copy), Some(symbol));
  assert_eq!(bindings.binding(symbol).references.len(), 2);
}
