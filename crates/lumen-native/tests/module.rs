use lumen_heap::Value;
use lumen_intern::StringPool;
use lumen_native::{create_module, NativeFuncDesc};
use lumen_vm::FuncBody;

#[test]
fn mangles_signatures_with_the_module_name_prefix() {
    let mut pool = StringPool::new();
    let descs = vec![
        NativeFuncDesc::new(
            "int add(int,int)",
            Box::new(|_h, _p, args| {
                let (Value::Int(a), Value::Int(b)) = (args[0], args[1]) else { panic!() };
                Ok(Some(Value::Int(a + b)))
            }),
        ),
        NativeFuncDesc::new(
            "void print(string)",
            Box::new(|_h, _p, _args| Ok(None)),
        ),
    ];

    let module = create_module(&mut pool, Some("std"), descs).unwrap();
    assert_eq!(module.funcs.len(), 2);

    let add = &module.funcs[0];
    assert_eq!(pool.as_str(add.sign), "std.add(int,int)");
    assert_eq!(pool.as_str(add.ret_type.unwrap()), "int");
    assert_eq!(add.arg_count, 2);
    assert!(matches!(add.body, FuncBody::Native(_)));

    let print = &module.funcs[1];
    assert_eq!(pool.as_str(print.sign), "std.print(string)");
    assert!(print.ret_type.is_none());
}

#[test]
fn no_module_name_means_no_dot_prefix() {
    let mut pool = StringPool::new();
    let descs = vec![NativeFuncDesc::new(
        "bool __op_eq(int,int)",
        Box::new(|_h, _p, args| {
            let (Value::Int(a), Value::Int(b)) = (args[0], args[1]) else { panic!() };
            Ok(Some(Value::Bool(a == b)))
        }),
    )];
    let module = create_module(&mut pool, None, descs).unwrap();
    assert_eq!(pool.as_str(module.funcs[0].sign), "__op_eq(int,int)");
}
