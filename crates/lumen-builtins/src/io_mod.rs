//! `io.*`: writing text, ints, and floats to standard output.

use lumen_heap::Value;
use lumen_intern::StringPool;
use lumen_native::NativeFuncDesc;

pub fn descs() -> Vec<NativeFuncDesc> {
    vec![
        NativeFuncDesc::new("void Write(string)", Box::new(|_h, p: &mut StringPool, args| {
            let Value::Str(s) = args[0] else { unreachable!("bind table guarantees argument types") };
            print!("{}", p.as_str(s));
            Ok(None)
        })),
        NativeFuncDesc::new("void WriteLine(string)", Box::new(|_h, p: &mut StringPool, args| {
            let Value::Str(s) = args[0] else { unreachable!("bind table guarantees argument types") };
            println!("{}", p.as_str(s));
            Ok(None)
        })),
        NativeFuncDesc::new("void WriteLine(int)", Box::new(|_h, _p, args| {
            let Value::Int(v) = args[0] else { unreachable!("bind table guarantees argument types") };
            println!("{v}");
            Ok(None)
        })),
        NativeFuncDesc::new("void WriteLine(float)", Box::new(|_h, _p, args| {
            let Value::Float(v) = args[0] else { unreachable!("bind table guarantees argument types") };
            println!("{v}");
            Ok(None)
        })),
    ]
}
