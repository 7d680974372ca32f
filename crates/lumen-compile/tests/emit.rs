use bumpalo::Bump;
use lumen_heap::{Heap, Value};
use lumen_intern::StringPool;
use lumen_par::Parser;
use lumen_sem::{FuncSig, ModuleTable, Registry};
use lumen_vm::{FuncBody, FuncRef, Function, Program, Vm};

fn link_add(main: &mut lumen_vm::CompiledModule, std_module_idx: u32, std_func_idx: u32, sign: lumen_intern::Symbol) {
    let pos = main.bind_signs.iter().position(|s| *s == sign).expect("bind not emitted");
    main.binds[pos] = Some(FuncRef { module: std_module_idx, func: std_func_idx });
}

#[test]
fn compiles_and_runs_a_function_with_a_desugared_operator() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut registry = Registry::new();

    let int = pool.intern_str("int");
    let add_sign = pool.intern_str("__op_add(int,int)");
    let mut std_table = ModuleTable::new(None);
    std_table.funcs.push(FuncSig { sign: add_sign, ret_type: Some(int), arg_count: 2 });
    registry.register(std_table);

    let src = "int add(int a, int b) { return a + b; }";
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();
    let resolved = lumen_sem::compile_module(&arena, &mut registry, &mut pool, &module, None).unwrap();

    let mut main_module = lumen_compile::compile_module(&resolved, &registry, &mut pool, None).unwrap();

    let std_func = Function {
        sign: add_sign,
        ret_type: Some(int),
        arg_count: 2,
        body: FuncBody::Native(Box::new(|_heap, _pool, args| {
            let (Value::Int(a), Value::Int(b)) = (args[0], args[1]) else { panic!("expected ints") };
            Ok(Some(Value::Int(a + b)))
        })),
    };
    let std_module = lumen_vm::CompiledModule {
        name: None,
        consts: vec![],
        funcs: vec![std_func],
        binds: vec![],
        bind_signs: vec![],
        types: vec![],
        type_names: vec![],
    };

    link_add(&mut main_module, 1, 0, add_sign);

    let add_idx = main_module.funcs.iter().position(|f| pool.as_str(f.sign).starts_with("add")).unwrap();
    let program = Program { modules: vec![main_module, std_module] };

    let mut heap = Heap::new();
    let mut vm = Vm::new();
    let result = vm
        .invoke(&program, &mut heap, &mut pool, 0, add_idx as u32, &[Value::Int(2), Value::Int(3)])
        .unwrap();
    assert_eq!(result, Some(Value::Int(5)));
}

#[test]
fn string_interpolation_folds_parts_left_to_right() {
    let arena = Bump::new();
    let mut pool = StringPool::new();
    let mut registry = Registry::new();

    let string = pool.intern_str("string");
    let int = pool.intern_str("int");
    let to_str_sign = pool.intern_str("string(int)");
    let concat_sign = pool.intern_str("__op_add(string,string)");

    let mut std_table = ModuleTable::new(None);
    std_table.funcs.push(FuncSig { sign: to_str_sign, ret_type: Some(string), arg_count: 1 });
    std_table.funcs.push(FuncSig { sign: concat_sign, ret_type: Some(string), arg_count: 2 });
    registry.register(std_table);

    // Three parts forces at least two folds, so a left-to-right fold
    // that drops the running value after the first fold would show up
    // as a wrong result rather than an out-of-bounds stack read.
    let src = r#"string describe(int k) { return "k = ${k} !"; }"#;
    let mut parser = Parser::new(&arena, src, &mut pool).unwrap();
    let module = parser.parse_module().unwrap();
    let resolved = lumen_sem::compile_module(&arena, &mut registry, &mut pool, &module, None).unwrap();
    let mut main_module = lumen_compile::compile_module(&resolved, &registry, &mut pool, None).unwrap();

    let to_str_func = Function {
        sign: to_str_sign,
        ret_type: Some(string),
        arg_count: 1,
        body: FuncBody::Native(Box::new(|_heap, pool, args| {
            let Value::Int(n) = args[0] else { panic!("expected int") };
            Ok(Some(Value::Str(pool.intern_str(&n.to_string()))))
        })),
    };
    let concat_func = Function {
        sign: concat_sign,
        ret_type: Some(string),
        arg_count: 2,
        body: FuncBody::Native(Box::new(|_heap, pool, args| {
            let (Value::Str(a), Value::Str(b)) = (args[0], args[1]) else { panic!("expected strings") };
            let joined = format!("{}{}", pool.as_str(a), pool.as_str(b));
            Ok(Some(Value::Str(pool.intern_str(&joined))))
        })),
    };
    let std_module = lumen_vm::CompiledModule {
        name: None,
        consts: vec![],
        funcs: vec![to_str_func, concat_func],
        binds: vec![],
        bind_signs: vec![],
        types: vec![],
        type_names: vec![],
    };

    link_add(&mut main_module, 1, 0, to_str_sign);
    link_add(&mut main_module, 1, 1, concat_sign);

    let func_idx = main_module.funcs.iter().position(|f| pool.as_str(f.sign).starts_with("describe")).unwrap();
    let program = Program { modules: vec![main_module, std_module] };

    let mut heap = Heap::new();
    let mut vm = Vm::new();
    let result = vm
        .invoke(&program, &mut heap, &mut pool, 0, func_idx as u32, &[Value::Int(7)])
        .unwrap()
        .unwrap();
    let Value::Str(sym) = result else { panic!("expected a string result") };
    assert_eq!(pool.as_str(sym), "k = 7 !");
}
