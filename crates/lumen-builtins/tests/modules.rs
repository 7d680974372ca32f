use lumen_heap::{Heap, Value};
use lumen_intern::StringPool;
use lumen_vm::FuncBody;

#[test]
fn registers_all_four_modules_with_expected_names() {
    let mut pool = StringPool::new();
    let modules = lumen_builtins::modules(&mut pool).unwrap();
    assert_eq!(modules.len(), 4);
    assert!(modules[0].name.is_none());
    assert_eq!(pool.as_str(modules[1].name.unwrap()), "math");
    assert_eq!(pool.as_str(modules[2].name.unwrap()), "io");
    assert_eq!(pool.as_str(modules[3].name.unwrap()), "time");
}

#[test]
fn std_int_add_is_registered_unprefixed_and_works() {
    let mut pool = StringPool::new();
    let modules = lumen_builtins::modules(&mut pool).unwrap();
    let std_mod = &modules[0];
    let add = std_mod
        .funcs
        .iter()
        .find(|f| pool.as_str(f.sign) == "__op_add(int,int)")
        .expect("int add should be registered");

    let FuncBody::Native(native) = &add.body else { panic!("expected a native body") };
    let mut heap = Heap::new();
    let result = native(&mut heap, &mut pool, &[Value::Int(2), Value::Int(40)]).unwrap();
    assert_eq!(result, Some(Value::Int(42)));
}

#[test]
fn math_abs_handles_both_int_and_float_overloads() {
    let mut pool = StringPool::new();
    let modules = lumen_builtins::modules(&mut pool).unwrap();
    let math_mod = &modules[1];

    let abs_int = math_mod.funcs.iter().find(|f| pool.as_str(f.sign) == "math.Abs(int)").unwrap();
    let FuncBody::Native(native) = &abs_int.body else { panic!() };
    let mut heap = Heap::new();
    assert_eq!(native(&mut heap, &mut pool, &[Value::Int(-7)]).unwrap(), Some(Value::Int(7)));

    let abs_float = math_mod.funcs.iter().find(|f| pool.as_str(f.sign) == "math.Abs(float)").unwrap();
    let FuncBody::Native(native) = &abs_float.body else { panic!() };
    assert_eq!(native(&mut heap, &mut pool, &[Value::Float(-2.5)]).unwrap(), Some(Value::Float(2.5)));
}

#[test]
fn int_division_by_zero_traps_instead_of_panicking() {
    let mut pool = StringPool::new();
    let modules = lumen_builtins::modules(&mut pool).unwrap();
    let std_mod = &modules[0];
    let div = std_mod.funcs.iter().find(|f| pool.as_str(f.sign) == "__op_div(int,int)").unwrap();
    let FuncBody::Native(native) = &div.body else { panic!() };
    let mut heap = Heap::new();
    assert!(native(&mut heap, &mut pool, &[Value::Int(1), Value::Int(0)]).is_err());
}
