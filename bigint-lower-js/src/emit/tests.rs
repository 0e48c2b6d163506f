use super::emit;
use super::emit_with_options;
use super::EmitOptions;
use crate::parse;

fn print(code: &str) -> String {
  emit(&parse(code).unwrap())
}

// Output must be a fixed point of parse then print.
#[track_caller]
fn assert_prints(code: &str, expected: &str) {
  let printed = print(code);
  assert_eq!(printed, expected);
  assert_eq!(print(&printed), expected);
}

#[test]
fn binary_precedence() {
  assert_prints("a+b*c", "a + b * c;\n");
  assert_prints("(a+b)*c", "(a + b) * c;\n");
  assert_prints("a-(b-c)", "a - (b - c);\n");
  assert_prints("a**b**c", "a ** b ** c;\n");
  assert_prints("(a**b)**c", "(a ** b) ** c;\n");
  assert_prints("a = b = c", "a = b = c;\n");
  assert_prints("(a, b), c", "a, b, c;\n");
  assert_prints("f((a, b))", "f((a, b));\n");
}

#[test]
fn unary_operands() {
  assert_prints("(-a)**b", "(-a) ** b;\n");
  assert_prints("- -a", "- -a;\n");
  assert_prints("a + +b", "a + +b;\n");
  assert_prints("-(a+b)", "-(a + b);\n");
  assert_prints("typeof x === 'bigint'", "typeof x === \"bigint\";\n");
  assert_prints("!(a && b)", "!(a && b);\n");
}

#[test]
fn nullish_mixing_keeps_parens() {
  assert_prints("a ?? (b || c)", "a ?? (b || c);\n");
  assert_prints("(a && b) ?? c", "(a && b) ?? c;\n");
}

#[test]
fn conditional() {
  assert_prints("a ? b : c ? d : e", "a ? b : c ? d : e;\n");
  assert_prints("(a ? b : c) ? d : e", "(a ? b : c) ? d : e;\n");
  assert_prints("(a = b) ? c : d", "(a = b) ? c : d;\n");
}

#[test]
fn statement_start_needs_parens() {
  assert_prints("({a: 1}).b", "({a: 1}.b);\n");
  assert_prints("(function(){})()", "(function() {}());\n");
  assert_prints("({a} = b)", "({a} = b);\n");
}

#[test]
fn members_and_calls() {
  assert_prints("(1).toString()", "(1).toString();\n");
  assert_prints("1.5.toFixed()", "1.5.toFixed();\n");
  assert_prints("new (a())()", "new (a())();\n");
  assert_prints("new a.b(c)", "new a.b(c);\n");
  assert_prints("a?.b?.(c)?.[d]", "a?.b?.(c)?.[d];\n");
  assert_prints("f(...args, x)", "f(...args, x);\n");
  assert_prints("(a + b).c", "(a + b).c;\n");
}

#[test]
fn arrows() {
  assert_prints("x => ({a: 1})", "(x) => ({a: 1});\n");
  assert_prints("x => (a, b)", "(x) => (a, b);\n");
  assert_prints("(x => x).call()", "((x) => x).call();\n");
  assert_prints(
    "async (a, ...b) => { await a; }",
    "async (a, ...b) => {\n  await a;\n};\n",
  );
}

#[test]
fn literals() {
  assert_prints("10n", "10n;\n");
  assert_prints("'a\"b'", "\"a\\\"b\";\n");
  assert_prints("`a${b}c`", "`a${b}c`;\n");
  assert_prints("[, a]", "[, a];\n");
  assert_prints("[a, ...b]", "[a, ...b];\n");
  assert_prints("x = /a+/g", "x = /a+/g;\n");
}

#[test]
fn objects() {
  assert_prints("({a, b: 1, ...c, [d]: 2})", "({a, b: 1, ...c, [d]: 2});\n");
  assert_prints(
    "var o = {f() { return 1; }};",
    "var o = {\n  f() {\n    return 1;\n  }\n};\n",
  );
  assert_prints("var {a, b: [c = 1], ...d} = e;", "var {a, b: [c = 1], ...d} = e;\n");
}

#[test]
fn control_flow() {
  assert_prints("if (a) b; else c;", "if (a)\n  b;\nelse\n  c;\n");
  assert_prints(
    "if (a) { b(); } else if (c) { d(); }",
    "if (a) {\n  b();\n} else if (c) {\n  d();\n}\n",
  );
  assert_prints(
    "if (a) if (b) c; else d; else e;",
    "if (a) {\n  if (b)\n    c;\n  else\n    d;\n} else\n  e;\n",
  );
  assert_prints("for (let i = 0; i < n; i++) {}", "for (let i = 0; i < n; i++) {}\n");
  assert_prints("for (;;) {}", "for (;;) {}\n");
  assert_prints("for (const x of xs) f(x);", "for (const x of xs)\n  f(x);\n");
  assert_prints("do x(); while (y);", "do\n  x();\nwhile (y);\n");
  assert_prints("do { x(); } while (y);", "do {\n  x();\n} while (y);\n");
  assert_prints(
    "try { a(); } catch (e) { b(); } finally { c(); }",
    "try {\n  a();\n} catch (e) {\n  b();\n} finally {\n  c();\n}\n",
  );
  assert_prints(
    "switch (a) { case 1: b(); break; default: c(); }",
    "switch (a) {\n  case 1:\n    b();\n    break;\n  default:\n    c();\n}\n",
  );
  assert_prints("outer: for (;;) break outer;", "outer: for (;;)\n  break outer;\n");
}

#[test]
fn functions_and_classes() {
  assert_prints(
    "function f(a, b = 1) { return a + b; }",
    "function f(a, b = 1) {\n  return a + b;\n}\n",
  );
  assert_prints(
    "class A extends B { static x = 1; get y() { return 2; } }",
    "class A extends B {\n  static x = 1;\n  get y() {\n    return 2;\n  }\n}\n",
  );
  assert_prints("function* g() { yield 1; }", "function* g() {\n  yield 1;\n}\n");
}

#[test]
fn modules() {
  assert_prints(
    "import x, {a as b, c} from 'm';",
    "import x, {a as b, c} from \"m\";\n",
  );
  assert_prints("import * as ns from 'm';", "import * as ns from \"m\";\n");
  assert_prints("export * as ns from 'm';", "export * as ns from \"m\";\n");
  assert_prints("export {a as b};", "export {a as b};\n");
  assert_prints("export const a = 1;", "export const a = 1;\n");
  assert_prints("export default a + b;", "export default a + b;\n");
}

#[test]
fn indent_width_is_configurable() {
  let ast = parse("if (a) { b(); }").unwrap();
  let printed = emit_with_options(&ast, EmitOptions { indent_width: 4 });
  assert_eq!(printed, "if (a) {\n    b();\n}\n");
}
