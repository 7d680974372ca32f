//! Operators and primitive-type conversions: `bool`/`int`/`float`/
//! `string` arithmetic, comparison, and the `int(T)`/`float(T)`/
//! `string(T)` conversion functions string interpolation calls into.
//! Registered with an empty module name, the same as the runtime this
//! one replaces registers its own operator table unprefixed.

use lumen_heap::Value;
use lumen_intern::StringPool;
use lumen_native::NativeFuncDesc;
use lumen_vm::VmError;

fn ints(args: &[Value]) -> (i64, i64) {
    let (Value::Int(a), Value::Int(b)) = (args[0], args[1]) else {
        unreachable!("bind table guarantees argument types")
    };
    (a, b)
}

fn floats(args: &[Value]) -> (f64, f64) {
    let (Value::Float(a), Value::Float(b)) = (args[0], args[1]) else {
        unreachable!("bind table guarantees argument types")
    };
    (a, b)
}

fn bools(args: &[Value]) -> (bool, bool) {
    let (Value::Bool(a), Value::Bool(b)) = (args[0], args[1]) else {
        unreachable!("bind table guarantees argument types")
    };
    (a, b)
}

macro_rules! native {
    (|$heap:ident, $pool:ident, $args:ident| $body:expr) => {
        Box::new(move |$heap: &mut lumen_heap::Heap, $pool: &mut StringPool, $args: &[Value]| $body)
    };
}

pub fn descs() -> Vec<NativeFuncDesc> {
    vec![
        NativeFuncDesc::new("bool __op_and(bool,bool)", native!(|_h, _p, args| {
            let (a, b) = bools(args);
            Ok(Some(Value::Bool(a && b)))
        })),
        NativeFuncDesc::new("bool __op_or(bool,bool)", native!(|_h, _p, args| {
            let (a, b) = bools(args);
            Ok(Some(Value::Bool(a || b)))
        })),
        NativeFuncDesc::new("int __op_pos(int)", native!(|_h, _p, args| {
            Ok(Some(args[0]))
        })),
        NativeFuncDesc::new("int __op_neg(int)", native!(|_h, _p, args| {
            let Value::Int(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Int(-a)))
        })),
        NativeFuncDesc::new("int __op_not(int)", native!(|_h, _p, args| {
            let Value::Int(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Int((a == 0) as i64)))
        })),
        NativeFuncDesc::new("int __op_bnot(int)", native!(|_h, _p, args| {
            let Value::Int(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Int(!a)))
        })),
        NativeFuncDesc::new("int __op_inc(int)", native!(|_h, _p, args| {
            let Value::Int(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Int(a + 1)))
        })),
        NativeFuncDesc::new("int __op_dec(int)", native!(|_h, _p, args| {
            let Value::Int(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Int(a - 1)))
        })),
        NativeFuncDesc::new("int __op_add(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a.wrapping_add(b))))
        })),
        NativeFuncDesc::new("int __op_sub(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a.wrapping_sub(b))))
        })),
        NativeFuncDesc::new("int __op_mul(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a.wrapping_mul(b))))
        })),
        NativeFuncDesc::new("int __op_div(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            a.checked_div(b)
                .map(|v| Some(Value::Int(v)))
                .ok_or_else(|| VmError::NativeTrap("__op_div".into(), "division by zero".into()))
        })),
        NativeFuncDesc::new("int __op_mod(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            a.checked_rem(b)
                .map(|v| Some(Value::Int(v)))
                .ok_or_else(|| VmError::NativeTrap("__op_mod".into(), "division by zero".into()))
        })),
        NativeFuncDesc::new("int __op_bor(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a | b)))
        })),
        NativeFuncDesc::new("int __op_bxor(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a ^ b)))
        })),
        NativeFuncDesc::new("int __op_shl(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a.wrapping_shl(b as u32))))
        })),
        NativeFuncDesc::new("int __op_shr(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a.wrapping_shr(b as u32))))
        })),
        NativeFuncDesc::new("int __op_band(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Int(a & b)))
        })),
        NativeFuncDesc::new("bool __op_lt(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Bool(a < b)))
        })),
        NativeFuncDesc::new("bool __op_leq(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Bool(a <= b)))
        })),
        NativeFuncDesc::new("bool __op_gt(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Bool(a > b)))
        })),
        NativeFuncDesc::new("bool __op_geq(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Bool(a >= b)))
        })),
        NativeFuncDesc::new("bool __op_eq(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Bool(a == b)))
        })),
        NativeFuncDesc::new("bool __op_neq(int,int)", native!(|_h, _p, args| {
            let (a, b) = ints(args);
            Ok(Some(Value::Bool(a != b)))
        })),
        NativeFuncDesc::new("float float(int)", native!(|_h, _p, args| {
            let Value::Int(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Float(a as f64)))
        })),
        NativeFuncDesc::new("string string(int)", native!(|_h, p, args| {
            let Value::Int(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Str(p.intern_str(&a.to_string()))))
        })),
        NativeFuncDesc::new("float __op_neg(float)", native!(|_h, _p, args| {
            let Value::Float(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Float(-a)))
        })),
        NativeFuncDesc::new("float __op_add(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Float(a + b)))
        })),
        NativeFuncDesc::new("float __op_sub(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Float(a - b)))
        })),
        NativeFuncDesc::new("float __op_mul(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Float(a * b)))
        })),
        NativeFuncDesc::new("float __op_div(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Float(a / b)))
        })),
        NativeFuncDesc::new("float __op_mod(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Float(a % b)))
        })),
        NativeFuncDesc::new("bool __op_lt(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Bool(a < b)))
        })),
        NativeFuncDesc::new("bool __op_leq(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Bool(a <= b)))
        })),
        NativeFuncDesc::new("bool __op_gt(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Bool(a > b)))
        })),
        NativeFuncDesc::new("bool __op_geq(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Bool(a >= b)))
        })),
        NativeFuncDesc::new("bool __op_eq(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Bool(a == b)))
        })),
        NativeFuncDesc::new("bool __op_neq(float,float)", native!(|_h, _p, args| {
            let (a, b) = floats(args);
            Ok(Some(Value::Bool(a != b)))
        })),
        NativeFuncDesc::new("int int(float)", native!(|_h, _p, args| {
            let Value::Float(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Int(a as i64)))
        })),
        NativeFuncDesc::new("string string(float)", native!(|_h, p, args| {
            let Value::Float(a) = args[0] else { unreachable!() };
            Ok(Some(Value::Str(p.intern_str(&format!("{a}")))))
        })),
        NativeFuncDesc::new("string __op_add(string,string)", native!(|_h, p, args| {
            let (Value::Str(a), Value::Str(b)) = (args[0], args[1]) else { unreachable!() };
            Ok(Some(Value::Str(p.concat(a, b))))
        })),
        NativeFuncDesc::new("bool __op_eq(string,string)", native!(|_h, _p, args| {
            let (Value::Str(a), Value::Str(b)) = (args[0], args[1]) else { unreachable!() };
            Ok(Some(Value::Bool(a == b)))
        })),
        NativeFuncDesc::new("bool __op_neq(string,string)", native!(|_h, _p, args| {
            let (Value::Str(a), Value::Str(b)) = (args[0], args[1]) else { unreachable!() };
            Ok(Some(Value::Bool(a != b)))
        })),
    ]
}
