use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("a single jump spans more than 32767 bytes of bytecode")]
    JumpTooFar,
    #[error("a module's constant pool grew past 65535 entries")]
    TooManyConsts,
    #[error("a module's bind table grew past 65535 entries")]
    TooManyBinds,
    #[error("a module's type table grew past 65535 entries")]
    TooManyTypes,
}
