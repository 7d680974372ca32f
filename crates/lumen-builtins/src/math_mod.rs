//! `math.*`: the small set of free functions every embedded scripting
//! runtime's math library carries — absolute value, rounding,
//! min/max, powers, logs, and trigonometry, all delegating straight to
//! `f64`'s own methods.

use lumen_heap::Value;
use lumen_native::NativeFuncDesc;

macro_rules! native {
    (|$args:ident| $body:expr) => {
        Box::new(move |_h: &mut lumen_heap::Heap, _p: &mut lumen_intern::StringPool, $args: &[Value]| $body)
    };
}

fn f(args: &[Value], i: usize) -> f64 {
    let Value::Float(v) = args[i] else { unreachable!("bind table guarantees argument types") };
    v
}

pub fn descs() -> Vec<NativeFuncDesc> {
    vec![
        NativeFuncDesc::new("int Abs(int)", native!(|args| {
            let Value::Int(v) = args[0] else { unreachable!() };
            Ok(Some(Value::Int(v.abs())))
        })),
        NativeFuncDesc::new("float Abs(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).abs()))))),
        NativeFuncDesc::new("float Ceiling(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).ceil()))))),
        NativeFuncDesc::new("float Floor(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).floor()))))),
        NativeFuncDesc::new("float Log(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).ln()))))),
        NativeFuncDesc::new("float Log2(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).log2()))))),
        NativeFuncDesc::new("float Log10(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).log10()))))),
        NativeFuncDesc::new("int Max(int,int)", native!(|args| {
            let (Value::Int(a), Value::Int(b)) = (args[0], args[1]) else { unreachable!() };
            Ok(Some(Value::Int(a.max(b))))
        })),
        NativeFuncDesc::new("float Max(float,float)", native!(|args| Ok(Some(Value::Float(f(args, 0).max(f(args, 1))))))),
        NativeFuncDesc::new("int Min(int,int)", native!(|args| {
            let (Value::Int(a), Value::Int(b)) = (args[0], args[1]) else { unreachable!() };
            Ok(Some(Value::Int(a.min(b))))
        })),
        NativeFuncDesc::new("float Min(float,float)", native!(|args| Ok(Some(Value::Float(f(args, 0).min(f(args, 1))))))),
        NativeFuncDesc::new("float Pow(float,float)", native!(|args| Ok(Some(Value::Float(f(args, 0).powf(f(args, 1))))))),
        NativeFuncDesc::new("float Round(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).round()))))),
        NativeFuncDesc::new("int Sign(int)", native!(|args| {
            let Value::Int(v) = args[0] else { unreachable!() };
            Ok(Some(Value::Int(if v < 0 { -1 } else { 1 })))
        })),
        NativeFuncDesc::new("float Sign(float)", native!(|args| Ok(Some(Value::Float(if f(args, 0) < 0.0 { -1.0 } else { 1.0 }))))),
        NativeFuncDesc::new("float Sqrt(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).sqrt()))))),
        NativeFuncDesc::new("float ACos(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).acos()))))),
        NativeFuncDesc::new("float ASin(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).asin()))))),
        NativeFuncDesc::new("float ATan(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).atan()))))),
        NativeFuncDesc::new("float ATan2(float,float)", native!(|args| Ok(Some(Value::Float(f(args, 0).atan2(f(args, 1))))))),
        NativeFuncDesc::new("float Cos(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).cos()))))),
        NativeFuncDesc::new("float Sin(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).sin()))))),
        NativeFuncDesc::new("float Tan(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).tan()))))),
        NativeFuncDesc::new("float ACosH(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).acosh()))))),
        NativeFuncDesc::new("float ASinH(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).asinh()))))),
        NativeFuncDesc::new("float ATanH(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).atanh()))))),
        NativeFuncDesc::new("float CosH(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).cosh()))))),
        NativeFuncDesc::new("float SinH(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).sinh()))))),
        NativeFuncDesc::new("float TanH(float)", native!(|args| Ok(Some(Value::Float(f(args, 0).tanh()))))),
    ]
}
