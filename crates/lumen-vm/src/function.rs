use crate::error::VmError;
use lumen_heap::{Heap, Value};
use lumen_intern::{StringPool, Symbol};

/// A native function's calling convention: given the heap and string
/// pool (the only shared mutable state a native call can touch) and its
/// argument slice, return the value it hands back, or `None` for a
/// void-returning function.
pub type NativeFn = Box<dyn Fn(&mut Heap, &mut StringPool, &[Value]) -> Result<Option<Value>, VmError> + Send + Sync>;

pub enum FuncBody {
    Bytecode { code: Vec<u8>, local_count: u8 },
    Native(NativeFn),
}

impl std::fmt::Debug for FuncBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuncBody::Bytecode { code, local_count } => f
                .debug_struct("Bytecode")
                .field("code_len", &code.len())
                .field("local_count", local_count)
                .finish(),
            FuncBody::Native(_) => f.write_str("Native(..)"),
        }
    }
}

#[derive(Debug)]
pub struct Function {
    pub sign: Symbol,
    pub ret_type: Option<Symbol>,
    pub arg_count: u8,
    pub body: FuncBody,
}
