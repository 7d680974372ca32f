use bumpalo::Bump;
use lumen_intern::StringPool;
use lumen_par::{BinaryOp, Expr, Parser, Stmt};

fn parse_expr<'a>(arena: &'a Bump, pool: &mut StringPool, src: &str) -> &'a Expr<'a> {
    let mut parser = Parser::new(arena, src, pool).unwrap();
    parser.parse_expr().unwrap()
}

#[test]
fn ampersand_parses_to_bitwise_and_not_equality() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let expr = parse_expr(&arena, &mut pool, "a & b");
    match expr {
        Expr::Binary { op, .. } => assert_eq!(*op, BinaryOp::BAnd),
        other => panic!("expected binary expr, got {other:?}"),
    }
}

#[test]
fn precedence_additive_under_shift_under_relational() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    // `1 + 2 < 3 << 4` should parse as `(1 + 2) < (3 << 4)`.
    let expr = parse_expr(&arena, &mut pool, "1 + 2 < 3 << 4");
    match expr {
        Expr::Binary { op: BinaryOp::Lt, lhs, rhs, .. } => {
            assert!(matches!(lhs, Expr::Binary { op: BinaryOp::Add, .. }));
            assert!(matches!(rhs, Expr::Binary { op: BinaryOp::Shl, .. }));
        }
        other => panic!("expected relational expr at the top, got {other:?}"),
    }
}

#[test]
fn true_and_false_parse_as_bool_literals() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    assert!(matches!(parse_expr(&arena, &mut pool, "true"), Expr::Bool(true, _)));
    assert!(matches!(parse_expr(&arena, &mut pool, "false"), Expr::Bool(false, _)));
}

#[test]
fn float_literal_without_trailing_fraction_digits() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    match parse_expr(&arena, &mut pool, "1.") {
        Expr::Float(v, _) => assert_eq!(*v, 1.0),
        other => panic!("expected float literal, got {other:?}"),
    }
}

#[test]
fn dotted_id_chain_builds_nested_id_nodes() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    match parse_expr(&arena, &mut pool, "a.b.c") {
        Expr::Id { primary: Some(Expr::Id { primary: Some(Expr::Id { primary: None, .. }), .. }), .. } => {}
        other => panic!("expected nested id chain, got {other:?}"),
    }
}

#[test]
fn invoke_parses_args_in_order() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    match parse_expr(&arena, &mut pool, "f(1, 2, 3)") {
        Expr::Invoke { args, .. } => assert_eq!(args.len(), 3),
        other => panic!("expected invoke expr, got {other:?}"),
    }
}

#[test]
fn string_interpolation_builds_parts() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    match parse_expr(&arena, &mut pool, "\"a${1}b\"") {
        Expr::StrInterp(parts, _) => assert_eq!(parts.len(), 3),
        other => panic!("expected interpolated string, got {other:?}"),
    }
}

#[test]
fn ternary_parses_branches() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    assert!(matches!(
        parse_expr(&arena, &mut pool, "a ? 1 : 2"),
        Expr::Cond { .. }
    ));
}

#[test]
fn for_statement_is_reserved_but_not_implemented() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut parser = Parser::new(&arena, "for (;;) {}", &mut pool).unwrap();
    assert!(parser.parse_stmt().is_err());
}

#[test]
fn decl_stmt_disambiguated_from_expr_stmt() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut parser = Parser::new(&arena, "int x = 1;", &mut pool).unwrap();
    match parser.parse_stmt().unwrap() {
        Stmt::Decl { name: _, init: Some(_), .. } => {}
        other => panic!("expected decl stmt, got {other:?}"),
    }
}

#[test]
fn plain_assignment_parses_as_expr_stmt_not_decl() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut parser = Parser::new(&arena, "x = 1;", &mut pool).unwrap();
    match parser.parse_stmt().unwrap() {
        Stmt::Expr(_) => {}
        other => panic!("expected expr stmt, got {other:?}"),
    }
}

#[test]
fn struct_and_function_decls_parse_at_module_level() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let src = r#"
        struct Point {
            int x;
            int y;
        }

        int add(int a, int b) {
            return a + b;
        }
    "#;
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();
    assert_eq!(module.types.len(), 1);
    assert_eq!(module.funcs.len(), 1);
    assert_eq!(module.types[0].fields.len(), 2);
    assert_eq!(module.funcs[0].params.len(), 2);
}

#[test]
fn struct_init_expr_parses_via_invoke_on_type_name() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    // Construction reuses call syntax against the bare type name: `Point(1, 2)`.
    match parse_expr(&arena, &mut pool, "Point(1, 2)") {
        Expr::Invoke { args, .. } => assert_eq!(args.len(), 2),
        other => panic!("expected invoke-shaped construction, got {other:?}"),
    }
}

#[test]
fn struct_init_expr_parses_via_brace_list_on_type_name() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    match parse_expr(&arena, &mut pool, "Point { 1, 2 }") {
        Expr::Invoke { callee, args, .. } => {
            assert_eq!(args.len(), 2);
            assert!(matches!(callee, Expr::Id { primary: None, .. }));
        }
        other => panic!("expected invoke-shaped construction, got {other:?}"),
    }
}

#[test]
fn decl_stmt_with_bare_brace_init_constructs_the_declared_type() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut parser = Parser::new(&arena, "Point p = { 3, 4 };", &mut pool).unwrap();
    match parser.parse_stmt().unwrap() {
        Stmt::Decl { type_ref: Some(type_ref), init: Some(Expr::Invoke { callee, args, .. }), .. } => {
            assert_eq!(args.len(), 2);
            match callee {
                Expr::Id { name, primary: None, .. } => assert_eq!(*name, type_ref.name),
                other => panic!("expected callee to name the declared type, got {other:?}"),
            }
        }
        other => panic!("expected a decl stmt with a brace-constructed init, got {other:?}"),
    }
}
