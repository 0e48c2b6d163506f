use super::validate::EVAL_CODE;
use super::validate::UPDATE_CODE;
use super::RewriteOutcome;
use super::Rewriter;
use crate::ast::stx::Syntax;
use crate::diagnostics::FileId;
use crate::emit::emit;
use crate::err::UnsupportedConstruct;
use crate::parse;
use crate::symbol::bind;

fn try_lower(code: &str) -> (String, Result<RewriteOutcome, UnsupportedConstruct>) {
  let mut ast = parse(code).unwrap();
  let mut bindings = bind(&ast);
  let result = Rewriter::new(&mut ast, &mut bindings, FileId(0)).run(None);
  (emit(&ast), result)
}

fn lower(code: &str) -> String {
  let (out, result) = try_lower(code);
  result.unwrap();
  out
}

#[test]
fn literals() {
  assert_eq!(
    lower("const a = 1n; const b = 12345678901234567890n;"),
    "const a = JSBI.BigInt(1);\nconst b = JSBI.BigInt(\"12345678901234567890\");\n"
  );
}

#[test]
fn literals_past_the_safe_range_become_strings() {
  assert_eq!(
    lower("9007199254740991n; 9007199254740992n;"),
    "JSBI.BigInt(9007199254740991);\nJSBI.BigInt(\"9007199254740992\");\n"
  );
}

#[test]
fn arithmetic() {
  assert_eq!(
    lower("const a = 1n; const b = a * a + a; const c = -a;"),
    concat!(
      "const a = JSBI.BigInt(1);\n",
      "const b = JSBI.add(JSBI.multiply(a, a), a);\n",
      "const c = JSBI.unaryMinus(a);\n",
    )
  );
}

#[test]
fn comparisons() {
  assert_eq!(
    lower("const a = 1n; const c = a < 2n; const d = a === a;"),
    concat!(
      "const a = JSBI.BigInt(1);\n",
      "const c = JSBI.lessThan(a, JSBI.BigInt(2));\n",
      "const d = JSBI.equal(a, a);\n",
    )
  );
}

#[test]
fn native_code_is_untouched() {
  let (out, result) = try_lower("const x = 1; const y = x + 2 < 3;");
  let outcome = result.unwrap();
  assert_eq!(out, "const x = 1;\nconst y = x + 2 < 3;\n");
  assert_eq!(outcome.replacements, 0);
  assert!(!outcome.uses_dispatch_shim);
}

#[test]
fn unknown_operands_use_the_dispatch_shim() {
  let (out, result) = try_lower("export function f(a, b) { return a + b; }");
  let outcome = result.unwrap();
  assert!(out.contains("return maybeJSBI.add(a, b);"), "{}", out);
  assert!(outcome.uses_dispatch_shim);
}

#[test]
fn typeof_guards() {
  assert_eq!(lower("typeof x === \"bigint\";"), "x instanceof JSBI;\n");
  assert_eq!(lower("typeof x !== \"bigint\";"), "!(x instanceof JSBI);\n");
  assert_eq!(lower("typeof x === \"number\";"), "typeof x === \"number\";\n");
}

#[test]
fn conversions() {
  assert_eq!(
    lower("const a = 1n; const n = Number(a); const b = BigInt(5); const m = Number(\"3\");"),
    concat!(
      "const a = JSBI.BigInt(1);\n",
      "const n = JSBI.toNumber(a);\n",
      "const b = JSBI.BigInt(5);\n",
      "const m = Number(\"3\");\n",
    )
  );
  assert_eq!(
    lower("const a = 1n; BigInt.asUintN(64, a);"),
    "const a = JSBI.BigInt(1);\nJSBI.asUintN(64, a);\n"
  );
}

#[test]
fn compound_assignment_to_identifier() {
  assert_eq!(
    lower("let a = 1n; a += 2n;"),
    "let a = JSBI.BigInt(1);\na = JSBI.add(a, JSBI.BigInt(2));\n"
  );
}

#[test]
fn compound_assignment_reuses_constant_operands() {
  assert_eq!(
    lower("const o = {}; const k = \"n\"; o[k] += 1n;"),
    "const o = {};\nconst k = \"n\";\no[k] = JSBI.add(o[k], JSBI.BigInt(1));\n"
  );
}

#[test]
fn compound_assignment_evaluates_object_once() {
  assert_eq!(
    lower("g().n += 2n;"),
    "var _x;\n_x = g(), _x.n = JSBI.add(_x.n, JSBI.BigInt(2));\n"
  );
}

#[test]
fn temporaries_avoid_existing_names() {
  let out = lower("let _x = 0; g().n += 2n;");
  assert!(out.starts_with("var _x2;\n"), "{}", out);
  assert!(out.contains("_x2 = g(), _x2.n = JSBI.add(_x2.n, JSBI.BigInt(2));"), "{}", out);
}

#[test]
fn temporaries_follow_directives() {
  let out = lower("\"use strict\"; g().n += 2n;");
  assert!(out.starts_with("\"use strict\";\nvar _x;\n"), "{}", out);
}

#[test]
fn temporaries_in_concise_arrow_bodies() {
  assert_eq!(
    lower("const f = (o) => o.p.q += 1n;"),
    concat!(
      "const f = (o) => {\n",
      "  var _x;\n",
      "  return _x = o.p, _x.q = JSBI.add(_x.q, JSBI.BigInt(1));\n",
      "};\n",
    )
  );
}

#[test]
fn mutually_dependent_loop_variables() {
  assert_eq!(
    lower("let a = 0n, b = 1n; while (c) { a = a + b; b = b * a; }"),
    concat!(
      "let a = JSBI.BigInt(0), b = JSBI.BigInt(1);\n",
      "while (c) {\n",
      "  a = JSBI.add(a, b);\n",
      "  b = JSBI.multiply(b, a);\n",
      "}\n",
    )
  );
}

#[test]
fn native_accumulator_of_bigint_stays_native() {
  // Adding a BigInt to a number throws, so `b` keeps its native classification.
  assert_eq!(
    lower("let a = 0n, b = 0; while (c) { a = a + 1n; b = b + a; }"),
    concat!(
      "let a = JSBI.BigInt(0), b = 0;\n",
      "while (c) {\n",
      "  a = JSBI.add(a, JSBI.BigInt(1));\n",
      "  b = b + a;\n",
      "}\n",
    )
  );
}

#[test]
fn rejected_units_are_left_unchanged() {
  let code = "const a = 1n; a++;";
  let (out, result) = try_lower(code);
  assert_eq!(result.unwrap_err().code, UPDATE_CODE);
  assert_eq!(out, emit(&parse(code).unwrap()));

  let (_, result) = try_lower("eval(\"1n\");");
  assert_eq!(result.unwrap_err().code, EVAL_CODE);
}

#[test]
fn skipped_subtree_is_not_lowered() {
  let mut ast = parse("1n; 2n;").unwrap();
  let mut bindings = bind(&ast);
  let Syntax::TopLevel { body } = ast.stx(ast.root()) else {
    panic!("not a top level");
  };
  let skip = body[0];
  let outcome = Rewriter::new(&mut ast, &mut bindings, FileId(0))
    .run(Some(skip))
    .unwrap();
  assert_eq!(outcome.replacements, 1);
  assert_eq!(emit(&ast), "1n;\nJSBI.BigInt(2);\n");
}
