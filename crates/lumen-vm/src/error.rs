use thiserror::Error;

#[derive(Debug, Error)]
pub enum VmError {
    #[error("invalid opcode byte {0}")]
    InvalidOpcode(u8),
    #[error("bytecode truncated mid-instruction")]
    Truncated,
    #[error("bind table index {0} out of range")]
    UnresolvedBind(u16),
    #[error("native function `{0}` trapped: {1}")]
    NativeTrap(String, String),
    #[error("call stack depth exceeded the interpreter's recursion limit")]
    StackOverflow,
}
