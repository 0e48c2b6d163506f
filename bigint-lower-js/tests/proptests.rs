use bigint_lower_js::classify::Classification;
use bigint_lower_js::rewrite::MAX_SAFE_INTEGER;
use bigint_lower_js::transform;
use bigint_lower_js::TransformOptions;
use proptest::prelude::*;

fn arb_classification() -> impl Strategy<Value = Classification> {
  prop_oneof![
    Just(Classification::BigInt),
    Just(Classification::Native),
    Just(Classification::Unknown),
  ]
}

fn arb_operand() -> impl Strategy<Value = String> {
  prop_oneof![
    Just("x".to_string()),
    Just("y".to_string()),
    (0u32..1000).prop_map(|v| v.to_string()),
    (0u64..u64::MAX).prop_map(|v| format!("{}n", v)),
  ]
}

fn arb_expr() -> impl Strategy<Value = String> {
  let operator = prop_oneof![
    Just("+"),
    Just("-"),
    Just("*"),
    Just("**"),
    Just("<"),
    Just("==="),
    Just("&"),
    Just("<<"),
  ];
  arb_operand().prop_recursive(3, 16, 2, move |inner| {
    (inner.clone(), operator.clone(), inner).prop_map(|(l, op, r)| format!("({} {} {})", l, op, r))
  })
}

fn lowered_literal(value: u128) -> String {
  if value <= MAX_SAFE_INTEGER as u128 {
    format!("JSBI.BigInt({})", value)
  } else {
    format!("JSBI.BigInt(\"{}\")", value)
  }
}

proptest! {
  #[test]
  fn meet_has_unknown_as_identity(a in arb_classification()) {
    prop_assert_eq!(a.meet(Classification::Unknown), a);
    prop_assert_eq!(Classification::Unknown.meet(a), a);
    prop_assert_eq!(a.meet(a), a);
  }

  #[test]
  fn meet_is_commutative_and_associative(
    a in arb_classification(),
    b in arb_classification(),
    c in arb_classification(),
  ) {
    prop_assert_eq!(a.meet(b), b.meet(a));
    prop_assert_eq!(a.meet(b).meet(c), a.meet(b.meet(c)));
  }

  #[test]
  fn decimal_literals_round_trip(value in any::<u128>()) {
    let out = transform(&TransformOptions::default(), &format!("f({}n);", value)).unwrap();
    prop_assert!(out.code.contains(&format!("f({});", lowered_literal(value))), "{}", out.code);
  }

  #[test]
  fn hex_literals_round_trip(value in any::<u128>()) {
    let out = transform(&TransformOptions::default(), &format!("f(0x{:x}n);", value)).unwrap();
    prop_assert!(out.code.contains(&format!("f({});", lowered_literal(value))), "{}", out.code);
  }

  #[test]
  fn lowering_is_idempotent(expr in arb_expr()) {
    let source = format!("export function f(x, y) {{ return {}; }}", expr);
    let once = transform(&TransformOptions::default(), &source).unwrap();
    let twice = transform(&TransformOptions::default(), &once.code).unwrap();
    prop_assert_eq!(twice.replacements, 0);
    prop_assert_eq!(twice.code, once.code);
  }
}
