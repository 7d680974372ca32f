use lumen_heap::{Heap, Value};
use lumen_intern::StringPool;
use lumen_vm::{CompiledModule, FuncBody, FuncRef, Function, Program, Vm};

fn native_add() -> FuncBody {
    FuncBody::Native(Box::new(|_heap, _pool, args| {
        let (Value::Int(a), Value::Int(b)) = (args[0], args[1]) else {
            panic!("expected two ints");
        };
        Ok(Some(Value::Int(a + b)))
    }))
}

#[test]
fn calls_a_native_function_and_returns_its_result() {
    let mut pool = StringPool::new();
    let add_sign = pool.intern_str("__op_add(int,int)");
    let main_sign = pool.intern_str("main()");

    // main() { return 1 + 2; }  -- `1 + 2` already desugared to a call.
    let code = vec![
        0, 0, 0, // load_const 0  (1)
        0, 0, 1, // load_const 1  (2)
        7, 0, 0, // call bind 0 (__op_add)
        11, // return
    ];

    let module = CompiledModule {
        name: None,
        consts: vec![Value::Int(1), Value::Int(2)],
        funcs: vec![
            Function { sign: main_sign, ret_type: Some(pool.intern_str("int")), arg_count: 0, body: FuncBody::Bytecode { code, local_count: 0 } },
            Function { sign: add_sign, ret_type: Some(pool.intern_str("int")), arg_count: 2, body: native_add() },
        ],
        binds: vec![Some(FuncRef { module: 0, func: 1 })],
        bind_signs: vec![add_sign],
        types: vec![],
        type_names: vec![],
    };

    let program = Program { modules: vec![module] };
    let mut heap = Heap::new();
    let mut vm = Vm::new();

    let result = vm.invoke(&program, &mut heap, &mut pool, 0, 0, &[]).unwrap();
    assert_eq!(result, Some(Value::Int(3)));
}

#[test]
fn store_field_on_a_null_object_is_a_no_op() {
    let mut pool = StringPool::new();
    let sign = pool.intern_str("f()");

    // store_field into a null ref, then return void.
    let code = vec![
        0, 0, 0, // load_const 0 (the value to (not) store)
        0, 0, 1, // load_const 1 (Unit placeholder standing in for the null ref slot)
        6, 0, // store_field 0
        11, // return
    ];
    let module = CompiledModule {
        name: None,
        consts: vec![Value::Int(42), Value::Obj(None)],
        funcs: vec![Function { sign, ret_type: None, arg_count: 0, body: FuncBody::Bytecode { code, local_count: 0 } }],
        binds: vec![],
        bind_signs: vec![],
        types: vec![],
        type_names: vec![],
    };
    let program = Program { modules: vec![module] };
    let mut heap = Heap::new();
    let mut vm = Vm::new();

    let result = vm.invoke(&program, &mut heap, &mut pool, 0, 0, &[]).unwrap();
    assert_eq!(result, None);
}
