//! The bytecode format and the stack-based interpreter that runs it.

pub mod error;
pub mod function;
pub mod interp;
pub mod module;
pub mod opcode;

pub use error::VmError;
pub use function::{FuncBody, Function, NativeFn};
pub use interp::Vm;
pub use module::{CompiledModule, FuncRef, Program};
pub use opcode::Opcode;
