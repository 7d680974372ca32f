use bumpalo::Bump;
use lumen_intern::StringPool;
use lumen_par::Parser;
use lumen_sem::{compile_module, FuncSig, ModuleTable, Registry, TypeDef};

fn register_std_ops(registry: &mut Registry, pool: &mut StringPool) {
    let mut table = ModuleTable::new(None);
    let int = pool.intern_str("int");
    for op in ["__op_add", "__op_band", "__op_eq"] {
        let sign_str = format!("{op}(int,int)");
        table.funcs.push(FuncSig {
            sign: pool.intern_str(&sign_str),
            ret_type: Some(int),
            arg_count: 2,
        });
    }
    registry.register(table);
}

#[test]
fn ampersand_mangles_to_band_not_eq() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut registry = Registry::new();
    register_std_ops(&mut registry, &mut pool);

    let src = "int f(int a, int b) { return a & b; }";
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();

    let resolved = compile_module(&arena, &mut registry, &mut pool, &module, None).unwrap();
    let func = &resolved.funcs[0];
    let band_sign = pool.intern_str("__op_band(int,int)");
    let eq_sign = pool.intern_str("__op_eq(int,int)");

    let mut saw_call_sign = None;
    if let lumen_sem::RStmt::Return(Some(expr)) = func.body[0] {
        if let lumen_sem::RExpr::Call { sign, .. } = expr {
            saw_call_sign = Some(*sign);
        }
    }
    assert_eq!(saw_call_sign, Some(band_sign));
    assert_ne!(saw_call_sign, Some(eq_sign));
}

#[test]
fn unresolved_operator_reports_the_attempted_signature() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut registry = Registry::new();
    // No operators registered at all.

    let src = "int f(int a, int b) { return a + b; }";
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();

    let err = compile_module(&arena, &mut registry, &mut pool, &module, None).unwrap_err();
    match err {
        lumen_sem::SemaError::Unresolved(_, sign) => assert_eq!(sign, "__op_add(int,int)"),
        other => panic!("expected Unresolved, got {other:?}"),
    }
}

#[test]
fn struct_construction_resolves_against_the_type_table() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut registry = Registry::new();
    register_std_ops(&mut registry, &mut pool);

    let src = r#"
        struct Point {
            int x;
            int y;
        }

        Point make(int x, int y) {
            return Point(x, y);
        }
    "#;
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();
    let resolved = compile_module(&arena, &mut registry, &mut pool, &module, None).unwrap();

    let make = resolved.funcs.iter().find(|f| pool.as_str(f.sign).starts_with("make")).unwrap();
    match make.body[0] {
        lumen_sem::RStmt::Return(Some(lumen_sem::RExpr::Construct { type_name, args, .. })) => {
            assert_eq!(pool.as_str(*type_name), "Point");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected a Construct return, got {other:?}"),
    }
}

#[test]
fn a_local_declared_in_an_inner_block_does_not_escape_it() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut registry = Registry::new();
    register_std_ops(&mut registry, &mut pool);

    let src = "int f() { { int a = 5; } return a; }";
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();

    let err = compile_module(&arena, &mut registry, &mut pool, &module, None).unwrap_err();
    assert!(matches!(err, lumen_sem::SemaError::UnknownIdent(_)));
}

#[test]
fn a_local_declared_in_a_brace_less_if_body_does_not_escape_it() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut registry = Registry::new();
    register_std_ops(&mut registry, &mut pool);

    let src = "int f(int b) { if (b) int a = 5; return a; }";
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();

    let err = compile_module(&arena, &mut registry, &mut pool, &module, None).unwrap_err();
    assert!(matches!(err, lumen_sem::SemaError::UnknownIdent(_)));
}
