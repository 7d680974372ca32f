use crate::function::Function;
use lumen_heap::{TypeId, Value};
use lumen_intern::Symbol;

/// A resolved bind-table entry: which module and function a mangled
/// call signature points at. Filled in once, at link time, the same
/// way the runtime this one replaces patches each bind's function
/// pointer directly into the target module's function array instead of
/// re-resolving the signature on every call.
#[derive(Debug, Clone, Copy)]
pub struct FuncRef {
    pub module: u32,
    pub func: u32,
}

/// One compiled module: its constant pool, its functions, its resolved
/// call targets, and the type table `new` indexes into.
#[derive(Debug)]
pub struct CompiledModule {
    pub name: Option<Symbol>,
    pub consts: Vec<Value>,
    pub funcs: Vec<Function>,
    /// Indexed by the `u16` operand of `call`. Left unresolved
    /// (`None`) until linking assigns every signature a concrete
    /// target.
    pub binds: Vec<Option<FuncRef>>,
    pub bind_signs: Vec<Symbol>,
    /// Indexed by the `u16` operand of `new`. Resolved the same way as
    /// `binds`: the emitter records the struct's name, linking fills in
    /// the heap-assigned `TypeId`.
    pub types: Vec<Option<TypeId>>,
    pub type_names: Vec<Symbol>,
}

/// Every module known to one running interpreter, flattened so a
/// `call`'s resolved bind can jump straight to `(module, func)` without
/// a name lookup on the hot path.
#[derive(Debug, Default)]
pub struct Program {
    pub modules: Vec<CompiledModule>,
}
