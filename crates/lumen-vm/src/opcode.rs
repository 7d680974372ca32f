//! The bytecode instruction set. Fourteen opcodes, matching the actual
//! dispatch table of the interpreter this one replaces rather than the
//! (shorter, stale) list in its header — `store_arg`, `branch_if`, and
//! `new` are all live opcodes even though an old header comment forgot
//! them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Operand: `u16` index into the current function's module's
    /// constant pool.
    LoadConst = 0,
    /// Operand: `u8` argument slot.
    LoadArg = 1,
    /// Operand: `u8` argument slot.
    StoreArg = 2,
    /// Operand: `u8` local slot.
    LoadLocal = 3,
    /// Operand: `u8` local slot.
    StoreLocal = 4,
    /// Operand: `u8` field index. No-op if the object on top of the
    /// stack is the null reference.
    LoadField = 5,
    /// Operand: `u8` field index. No-op if the object is null.
    StoreField = 6,
    /// Operand: `u16` index into the current module's bind table.
    Call = 7,
    /// Operand: `i16` relative jump, from just after the operand.
    Branch = 8,
    /// Operand: `i16` relative jump, taken if the popped value is truthy.
    BranchIf = 9,
    /// Operand: `i16` relative jump, taken if the popped value is falsy.
    BranchIfN = 10,
    /// No operand. Pops the return value (if the function is non-void)
    /// and collapses the frame.
    Return = 11,
    /// No operand. Discards the top of the stack.
    Pop = 12,
    /// Operand: `u8` field count, then `u16` index into the current
    /// module's type table. Pops that many values (in field order) and
    /// pushes a freshly allocated object built from them.
    New = 13,
}

impl Opcode {
    pub fn from_u8(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        Some(match byte {
            0 => LoadConst,
            1 => LoadArg,
            2 => StoreArg,
            3 => LoadLocal,
            4 => StoreLocal,
            5 => LoadField,
            6 => StoreField,
            7 => Call,
            8 => Branch,
            9 => BranchIf,
            10 => BranchIfN,
            11 => Return,
            12 => Pop,
            13 => New,
            _ => return None,
        })
    }
}
