use super::Parser;
use crate::ast::stx::FuncBody;
use crate::ast::stx::ObjMember;
use crate::ast::stx::Syntax;
use crate::ast::Ast;
use crate::ast::NodeId;
use crate::error::SyntaxErrorKind;
use crate::lex::LexGoal;
use crate::lex::Lexer;
use crate::operator::OperatorName;
use crate::token::TokenKind;

fn parse(code: &str) -> Ast {
  let mut p = Parser::new(Lexer::new(code));
  p.parse_top_level().unwrap();
  p.into_ast()
}

fn body(ast: &Ast) -> Vec<NodeId> {
  match ast.stx(ast.root()) {
    Syntax::TopLevel { body } => body.clone(),
    other => panic!("expected top level, got {:?}", other),
  }
}

// The expression of the only statement.
fn expr(ast: &Ast) -> NodeId {
  match ast.stx(body(ast)[0]) {
    Syntax::ExprStmt { expression } => *expression,
    other => panic!("expected expression statement, got {:?}", other),
  }
}

fn parse_err(code: &str) -> SyntaxErrorKind {
  let mut p = Parser::new(Lexer::new(code));
  p.parse_top_level().unwrap_err().kind
}

#[test]
fn mark_and_rewind_reuse_lookahead() {
  let mut p = Parser::new(Lexer::new("let x = /a/ / 1;"));
  let mark = p.mark();

  assert_eq!(p.peek().kind, TokenKind::Let);
  assert_eq!((p.cursor, p.lookahead.len()), (0, 1));
  assert_eq!(p.bump().kind, TokenKind::Let);
  assert_eq!(p.bump().kind, TokenKind::Ident);
  assert_eq!((p.cursor, p.lookahead.len()), (2, 2));
  assert_eq!(p.prev_loc(), crate::loc::Loc(4, 5));

  p.rewind(mark);
  assert_eq!((p.cursor, p.lookahead.len()), (0, 2));
  assert_eq!(p.peek_pair().1.kind, TokenKind::Ident);

  // Another goal at a buffered position drops everything after it.
  assert_eq!(p.peek_in(LexGoal::RegExp).kind, TokenKind::Let);
  assert_eq!(p.lookahead.len(), 1);
}

#[test]
fn regex_goal_relexes_after_division() {
  let mut p = Parser::new(Lexer::new("x = /a/ / 1;"));
  p.bump();
  p.bump();
  assert_eq!(p.peek().kind, TokenKind::Slash);
  let regex = p.bump_in(LexGoal::RegExp);
  assert_eq!((regex.kind, p.str(regex.loc)), (TokenKind::Regex, "/a/"));
  assert_eq!(p.bump().kind, TokenKind::Slash);
}

#[test]
fn test_precedence_and_associativity() {
  let ast = parse("a + b * c ** d ** e;");
  let Syntax::Binary { operator, right, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  assert_eq!(*operator, OperatorName::Addition);
  let Syntax::Binary { operator, right, .. } = ast.stx(*right) else {
    panic!()
  };
  assert_eq!(*operator, OperatorName::Multiplication);
  // `**` is right associative.
  let Syntax::Binary { operator, left, right } = ast.stx(*right) else {
    panic!()
  };
  assert_eq!(*operator, OperatorName::Exponentiation);
  assert_eq!(ast.stx(*left).id_name(), Some("c"));
  assert!(matches!(ast.stx(*right), Syntax::Binary {
    operator: OperatorName::Exponentiation,
    ..
  }));

  let ast = parse("a - b - c;");
  let Syntax::Binary { left, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  assert!(matches!(ast.stx(*left), Syntax::Binary {
    operator: OperatorName::Subtraction,
    ..
  }));
}

#[test]
fn test_bigint_literals_keep_digits() {
  let ast = parse("x = 0x1Fn + 1_000n;");
  let Syntax::Binary { right, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  let Syntax::Binary { left, right, .. } = ast.stx(*right) else {
    panic!()
  };
  assert!(matches!(ast.stx(*left), Syntax::LitBigInt { value } if value == "0x1F"));
  assert!(matches!(ast.stx(*right), Syntax::LitBigInt { value } if value == "1000"));
}

#[test]
fn test_assignment_targets_become_patterns() {
  let ast = parse("x = 1;");
  let Syntax::Binary { left, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  assert!(matches!(ast.stx(*left), Syntax::IdPat { name } if name == "x"));

  let ast = parse("[a, , b = 2, ...c] = d;");
  let Syntax::Binary { left, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  let Syntax::ArrPat { elements, rest } = ast.stx(*left) else {
    panic!("expected array pattern")
  };
  assert_eq!(elements.len(), 3);
  assert!(elements[1].is_none());
  assert!(elements[2].as_ref().unwrap().default_value.is_some());
  assert!(rest.is_some());

  let ast = parse("({a, b: c} = d);");
  let Syntax::Binary { left, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  let Syntax::ObjPat { properties, .. } = ast.stx(*left) else {
    panic!("expected object pattern")
  };
  assert!(properties[0].shorthand);
  assert!(!properties[1].shorthand);

  assert_eq!(parse_err("a + b = c;"), SyntaxErrorKind::InvalidAssignmentTarget);
  assert_eq!(parse_err("1++;"), SyntaxErrorKind::InvalidAssignmentTarget);
}

#[test]
fn test_arrow_functions() {
  let ast = parse("f = (a, b = 1) => a;");
  let Syntax::Binary { right, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  let Syntax::Function { params, body, .. } = ast.stx(*right) else {
    panic!("expected arrow")
  };
  assert_eq!(params.len(), 2);
  assert!(matches!(body, FuncBody::Expression(_)));

  let ast = parse("async x => { await x; };");
  assert!(matches!(ast.stx(expr(&ast)), Syntax::Function {
    async_: true,
    body: FuncBody::Block(_),
    ..
  }));

  // A parenthesised expression is not an arrow head.
  let ast = parse("(a, b);");
  assert!(matches!(ast.stx(expr(&ast)), Syntax::Binary {
    operator: OperatorName::Comma,
    ..
  }));

  let ast = parse("async(a);");
  assert!(matches!(ast.stx(expr(&ast)), Syntax::Call { .. }));
}

#[test]
fn test_regex_and_division() {
  let ast = parse("x = /a/g / 2;");
  let Syntax::Binary { right, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  let Syntax::Binary { operator, left, .. } = ast.stx(*right) else {
    panic!()
  };
  assert_eq!(*operator, OperatorName::Division);
  assert!(matches!(ast.stx(*left), Syntax::LitRegex { value } if value == "/a/g"));
}

#[test]
fn test_template_literals() {
  let ast = parse("`a${ x }b${y}`;");
  let Syntax::LitTemplate { parts } = ast.stx(expr(&ast)) else {
    panic!("expected template")
  };
  assert_eq!(parts.len(), 5);
  assert!(matches!(&parts[0], crate::ast::stx::TemplatePart::String(s) if s == "a"));
  assert!(matches!(&parts[2], crate::ast::stx::TemplatePart::String(s) if s == "b"));
  assert!(matches!(&parts[4], crate::ast::stx::TemplatePart::String(s) if s.is_empty()));
}

#[test]
fn test_asi_and_postfix() {
  let ast = parse("a\n++b");
  assert_eq!(body(&ast).len(), 2);
  let ast = parse("let a = 1\nlet b = 2\n");
  assert_eq!(body(&ast).len(), 2);
  let ast = parse("function f() { return\n1 }");
  let Syntax::Function { body: FuncBody::Block(stmts), .. } = ast.stx(body(&ast)[0]) else {
    panic!()
  };
  assert!(matches!(ast.stx(stmts[0]), Syntax::Return { value: None }));
}

#[test]
fn test_statements() {
  let ast = parse(
    "for (let i = 0n; i < 10n; i += 1n) {}\n\
     for (const x of xs) continue;\n\
     for (k in o);\n\
     label: while (true) break label;\n\
     do x(); while (y)\n\
     switch (a) { case 1: b(); default: c(); }\n\
     try { t(); } catch { } finally { }\n\
     if (a) b(); else c();",
  );
  let stmts = body(&ast);
  assert_eq!(stmts.len(), 8);
  assert!(matches!(ast.stx(stmts[0]), Syntax::ForTriple { .. }));
  assert!(matches!(ast.stx(stmts[1]), Syntax::ForInOf { of: true, .. }));
  assert!(matches!(ast.stx(stmts[2]), Syntax::ForInOf { of: false, .. }));
  assert!(matches!(ast.stx(stmts[3]), Syntax::Label { .. }));
  assert!(matches!(ast.stx(stmts[4]), Syntax::DoWhile { .. }));
  assert!(matches!(ast.stx(stmts[5]), Syntax::Switch { branches, .. } if branches.len() == 2));
  assert!(matches!(ast.stx(stmts[6]), Syntax::Try { catch: Some(_), finally: Some(_), .. }));
  assert!(matches!(ast.stx(stmts[7]), Syntax::If { alternate: Some(_), .. }));
}

#[test]
fn test_classes_and_objects() {
  let ast = parse(
    "class A extends B { static x = 1n; get y() { return 1; } async *z() {} constructor() { super(); } }",
  );
  let Syntax::Class { members, extends, .. } = ast.stx(body(&ast)[0]) else {
    panic!("expected class")
  };
  assert!(extends.is_some());
  assert_eq!(members.len(), 4);

  let ast = parse("x = { a, b: 1, get c() { return 2; }, ...d, [e]: 3, f() {} };");
  let Syntax::Binary { right, .. } = ast.stx(expr(&ast)) else {
    panic!()
  };
  let Syntax::LitObj { members } = ast.stx(*right) else {
    panic!("expected object")
  };
  assert_eq!(members.len(), 6);
  assert!(matches!(
    ast.stx(members[0]),
    Syntax::ObjMember(ObjMember::Shorthand { .. })
  ));
  assert!(matches!(
    ast.stx(members[3]),
    Syntax::ObjMember(ObjMember::Spread { .. })
  ));
}

#[test]
fn test_modules() {
  let ast = parse(
    "import JSBI from \"jsbi\";\n\
     import d, { a as b, c } from './m';\n\
     import * as ns from 'n';\n\
     export const x = 1n;\n\
     export default function () {}\n\
     export { x as y };\n\
     export * from 'z';",
  );
  let stmts = body(&ast);
  assert_eq!(stmts.len(), 7);
  assert!(matches!(ast.stx(stmts[0]), Syntax::Import { module, default: Some(_), .. } if module == "jsbi"));
  assert!(matches!(ast.stx(stmts[1]), Syntax::Import { named, .. } if named.len() == 2));
  assert!(matches!(ast.stx(stmts[2]), Syntax::Import { namespace: Some(_), .. }));
  assert!(matches!(ast.stx(stmts[4]), Syntax::ExportDecl { default: true, .. }));
}

#[test]
fn test_parent_links() {
  let ast = parse("if (a) { b + c; }");
  for id in ast.descendants(ast.root()) {
    for child in ast.children(id) {
      assert_eq!(ast.parent(child), Some(id));
    }
  }
}

#[test]
fn test_unsupported_syntax() {
  assert!(matches!(
    parse_err("with (a) {}"),
    SyntaxErrorKind::Unsupported(_)
  ));
  assert!(matches!(
    parse_err("import('x');"),
    SyntaxErrorKind::Unsupported(_)
  ));
  assert_eq!(parse_err("try {}"), SyntaxErrorKind::TryWithoutHandler);
  assert_eq!(parse_err("f("), SyntaxErrorKind::UnexpectedEnd);
}

#[test]
fn unary_operand_of_exponentiation_needs_parentheses() {
  assert_eq!(parse_err("-x ** 2n;"), SyntaxErrorKind::UnaryBeforeExponentiation);
  assert_eq!(parse_err("typeof x ** 2;"), SyntaxErrorKind::UnaryBeforeExponentiation);
  let ast = parse("(-x) ** 2n;");
  assert!(matches!(ast.stx(expr(&ast)), Syntax::Binary {
    operator: OperatorName::Exponentiation,
    ..
  }));
  // The right operand may be unary.
  parse("x ** -2n;");
}

#[test]
fn unterminated_comment_is_rejected() {
  assert_eq!(parse_err("a; /* x"), SyntaxErrorKind::InvalidToken);
  assert_eq!(parse_err("/* x"), SyntaxErrorKind::InvalidToken);
}

#[test]
fn misplaced_numeric_separators_are_rejected() {
  assert_eq!(parse_err("1_n;"), SyntaxErrorKind::MalformedNumber);
  assert_eq!(parse_err("x = 1__0n;"), SyntaxErrorKind::MalformedNumber);
  assert_eq!(parse_err("x = 0x_1;"), SyntaxErrorKind::MalformedNumber);
  parse("x = 1_000n + 0b1_0n + 1_0.5;");
}

#[test]
fn test_json_shape() {
  let ast = parse("0x1Fn * -x;");
  assert_eq!(
    ast.to_json(expr(&ast)),
    serde_json::json!({
      "Binary": {
        "operator": "Multiplication",
        "left": { "LitBigInt": { "value": "0x1F" } },
        "right": {
          "Unary": {
            "operator": "UnaryNegation",
            "argument": { "Id": { "name": "x" } },
          },
        },
      },
    })
  );
}
