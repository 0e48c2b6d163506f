use bigint_lower_js::diagnostics::Severity;
use bigint_lower_js::emit::emit;
use bigint_lower_js::err::TransformError;
use bigint_lower_js::parse;
use bigint_lower_js::transform;
use bigint_lower_js::transform_bytes;
use bigint_lower_js::TransformOptions;
use bigint_lower_js::Transformer;
use similar::ChangeTag;
use similar::TextDiff;

#[track_caller]
fn assert_code_eq(actual: &str, expected: &str) {
  if actual == expected {
    return;
  }
  let diff = TextDiff::from_lines(expected, actual);
  let mut out = String::new();
  for change in diff.iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    out.push_str(&format!("{}{}", sign, change));
  }
  panic!("output differs from expected (-expected +actual):\n{}", out);
}

fn lower(source: &str) -> String {
  transform(&TransformOptions::default(), source).unwrap().code
}

#[track_caller]
fn assert_lowers_to(source: &str, expected: &str) {
  let once = lower(source);
  assert_code_eq(&once, expected);
  // Lowering the output again must be a no-op.
  let again = transform(&TransformOptions::default(), &once).unwrap();
  assert_eq!(again.replacements, 0);
  assert_code_eq(&again.code, &once);
}

#[test]
fn literals_round_trip_exactly() {
  assert_lowers_to(
    "export const values = [0n, 9007199254740991n, 9007199254740992n, 0x10n, 123456789012345678901234567890n];",
    concat!(
      "import JSBI from \"jsbi\";\n",
      "export const values = [JSBI.BigInt(0), JSBI.BigInt(9007199254740991), JSBI.BigInt(\"9007199254740992\"), JSBI.BigInt(16), JSBI.BigInt(\"123456789012345678901234567890\")];\n",
    ),
  );
}

#[test]
fn native_code_only_gains_the_import() {
  assert_lowers_to(
    "export const a = 1 + 2 * 3;",
    "import JSBI from \"jsbi\";\nexport const a = 1 + 2 * 3;\n",
  );
}

#[test]
fn guard_inference_from_leading_throw() {
  assert_lowers_to(
    concat!(
      "function f(p) {\n",
      "  if (typeof p !== \"bigint\") throw new TypeError(\"expected bigint\");\n",
      "  return p * 2n;\n",
      "}\n",
    ),
    concat!(
      "import JSBI from \"jsbi\";\n",
      "function f(p) {\n",
      "  if (!(p instanceof JSBI))\n",
      "    throw new TypeError(\"expected bigint\");\n",
      "  return JSBI.multiply(p, JSBI.BigInt(2));\n",
      "}\n",
    ),
  );
}

#[test]
fn mixed_call_sites_dispatch_at_runtime() {
  let source = concat!(
    "function add(a, b) { return a + b; }\n",
    "function mul(a, b) { return a * b; }\n",
    "add(1n, 2n); add(1, 2);\n",
    "mul(1n, 2n); mul(1, 2);\n",
  );
  let out = lower(source);
  assert!(out.contains("return maybeJSBI.add(a, b);"), "{}", out);
  assert!(out.contains("return maybeJSBI.multiply(a, b);"), "{}", out);
  assert!(out.contains("add(JSBI.BigInt(1), JSBI.BigInt(2));"), "{}", out);
  assert_eq!(out.matches("var maybeJSBI = {").count(), 1);
  assert_eq!(out.matches("import JSBI from \"jsbi\";").count(), 1);
  assert!(out.starts_with("import JSBI from \"jsbi\";\nvar maybeJSBI = {\n"), "{}", out);

  let again = lower(&out);
  assert_code_eq(&again, &out);
}

#[test]
fn relational_operators() {
  assert_lowers_to(
    concat!(
      "const a = 1n, b = 2n;\n",
      "export const lt = a < b;\n",
      "export const mixed = a < 3;\n",
    ),
    concat!(
      "import JSBI from \"jsbi\";\n",
      "const a = JSBI.BigInt(1), b = JSBI.BigInt(2);\n",
      "export const lt = JSBI.lessThan(a, b);\n",
      "export const mixed = a < 3;\n",
    ),
  );
}

#[test]
fn loop_carried_variable() {
  assert_lowers_to(
    concat!(
      "export function count(n) {\n",
      "  let i = 0n;\n",
      "  while (i < n) {\n",
      "    i = i + 1n;\n",
      "  }\n",
      "  return i;\n",
      "}\n",
    ),
    concat!(
      "import JSBI from \"jsbi\";\n",
      "export function count(n) {\n",
      "  let i = JSBI.BigInt(0);\n",
      "  while (JSBI.lessThan(i, n)) {\n",
      "    i = JSBI.add(i, JSBI.BigInt(1));\n",
      "  }\n",
      "  return i;\n",
      "}\n",
    ),
  );
}

#[test]
fn update_expressions_are_rejected_without_changes() {
  let source = "let x = 1n; x++;";
  let err = transform(&TransformOptions::default(), source).unwrap_err();
  assert!(matches!(err, TransformError::Unsupported(_)));
  assert_eq!(err.code(), "BL1003");

  let mut ast = parse(source).unwrap();
  let before = emit(&ast);
  assert!(Transformer::new(&mut ast, TransformOptions::default()).run().is_err());
  assert_code_eq(&emit(&ast), &before);
}

#[test]
fn classifier_warnings_are_reported() {
  let source = "export const t = this + 1n;";
  let out = transform(&TransformOptions::default(), source).unwrap();
  assert_eq!(out.diagnostics.len(), 1);
  assert_eq!(out.diagnostics[0].code, "BL0001");
  assert_eq!(out.diagnostics[0].severity, Severity::Warning);
  assert!(out.code.contains("JSBI.add(this, JSBI.BigInt(1))"), "{}", out.code);

  let quiet = TransformOptions::default().with_diagnostics(false);
  assert!(transform(&quiet, source).unwrap().diagnostics.is_empty());
}

#[test]
fn syntax_and_encoding_errors() {
  let err = transform(&TransformOptions::default(), "a +;").unwrap_err();
  assert!(matches!(err, TransformError::Syntax(_)));
  assert!(err.code().starts_with("PS"));

  let err = transform_bytes(&TransformOptions::default(), &[b'1', b'n', 0xff]).unwrap_err();
  assert!(matches!(err, TransformError::InvalidUtf8(_)));
  assert_eq!(err.code(), "BL1000");
}
