use thiserror::Error;

#[derive(Debug, Error)]
pub enum LumenError {
    #[error(transparent)]
    Parse(#[from] lumen_par::ParseError),
    #[error(transparent)]
    Sema(#[from] lumen_sem::SemaError),
    #[error(transparent)]
    Compile(#[from] lumen_compile::CompileError),
    #[error(transparent)]
    Native(#[from] lumen_native::NativeError),
    #[error(transparent)]
    Vm(#[from] lumen_vm::VmError),
    #[error("no function with signature `{0}` is registered in this context")]
    UnknownEntryPoint(String),
    #[error("`{0}` takes {1} argument(s), but {2} were given")]
    ArityMismatch(String, u8, usize),
    #[error("couldn't read {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("module `{0}` references undeclared function or operator `{1}`")]
    UnresolvedBind(String, String),
    #[error("module `{0}` constructs undeclared type `{1}`")]
    UnresolvedType(String, String),
}
