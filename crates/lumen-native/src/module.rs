use crate::error::NativeError;
use crate::sig::parse_signature;
use lumen_intern::StringPool;
use lumen_vm::{CompiledModule, FuncBody, Function, NativeFn};

/// One native function awaiting registration: its mangled-signature
/// source text and the closure that implements it.
pub struct NativeFuncDesc {
    pub sign: &'static str,
    pub func: NativeFn,
}

impl NativeFuncDesc {
    pub fn new(sign: &'static str, func: NativeFn) -> Self {
        NativeFuncDesc { sign, func }
    }
}

/// Builds a [`CompiledModule`] of native functions the same way the
/// runtime this one replaces builds one from a descriptor array: parse
/// each signature, mangle it (prefixed with the module name when one is
/// given), and wrap the native closure behind a [`Function`]. A native
/// module has no constant pool, bind table, or type table of its own —
/// only compiled (scripted) modules need those.
pub fn create_module(
    pool: &mut StringPool,
    name: Option<&str>,
    descs: Vec<NativeFuncDesc>,
) -> Result<CompiledModule, NativeError> {
    let mut funcs = Vec::with_capacity(descs.len());
    for desc in descs {
        let parsed = parse_signature(pool, desc.sign)?;
        let mut mangled = String::new();
        if let Some(n) = name {
            if !n.is_empty() {
                mangled.push_str(n);
                mangled.push('.');
            }
        }
        mangled.push_str(pool.as_str(parsed.name));
        mangled.push('(');
        for (i, arg) in parsed.args.iter().enumerate() {
            if i > 0 {
                mangled.push(',');
            }
            mangled.push_str(pool.as_str(*arg));
        }
        mangled.push(')');

        funcs.push(Function {
            sign: pool.intern_str(&mangled),
            ret_type: parsed.ret_type,
            arg_count: parsed.args.len() as u8,
            body: FuncBody::Native(desc.func),
        });
    }

    Ok(CompiledModule {
        name: name.map(|n| pool.intern_str(n)),
        consts: Vec::new(),
        funcs,
        binds: Vec::new(),
        bind_signs: Vec::new(),
        types: Vec::new(),
        type_names: Vec::new(),
    })
}
