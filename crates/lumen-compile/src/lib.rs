//! Bytecode emission: walks a resolved [`lumen_sem::RModule`], already
//! free of names and ambiguity, and produces a [`lumen_vm::CompiledModule`]
//! ready for linking. No further identifier lookups happen here — only
//! constant-pool and bind-table deduplication and jump back-patching.

pub mod emit;
pub mod error;

pub use emit::compile_module;
pub use error::CompileError;
