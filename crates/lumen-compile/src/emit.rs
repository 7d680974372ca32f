//! The bytecode emitter.
//!
//! Mirrors the code-generation shape of the interpreter this crate's
//! bytecode targets: unary and binary operators, and both plain and
//! compound assignment, all come in pre-desugared as
//! [`lumen_sem::RExpr::Call`] nodes — this emitter never special-cases
//! an operator, it just emits the call like any other. Constant-pool
//! and bind-table entries are deduplicated with a linear scan rather
//! than a hash map, matching the small-module assumption the format
//! was designed under.

use crate::error::CompileError;
use lumen_heap::Value;
use lumen_intern::{StringPool, Symbol};
use lumen_sem::{RExpr, RFunc, RModule, RStmt, Registry, StrInterpPart};
use lumen_vm::{CompiledModule, FuncBody, Function, Opcode};

pub fn compile_module(
    module: &RModule,
    registry: &Registry,
    pool: &mut StringPool,
    name: Option<Symbol>,
) -> Result<CompiledModule, CompileError> {
    let mut emitter = ModuleEmitter::new(pool);
    let mut funcs = Vec::with_capacity(module.funcs.len());
    for f in module.funcs.iter() {
        funcs.push(emitter.compile_func(f, registry)?);
    }
    let bind_count = emitter.binds.len();
    let type_count = emitter.types.len();
    Ok(CompiledModule {
        name,
        consts: emitter.consts,
        funcs,
        binds: vec![None; bind_count],
        bind_signs: emitter.binds,
        types: vec![None; type_count],
        type_names: emitter.types,
    })
}

struct ModuleEmitter<'p> {
    pool: &'p mut StringPool,
    consts: Vec<Value>,
    binds: Vec<Symbol>,
    types: Vec<Symbol>,
}

impl<'p> ModuleEmitter<'p> {
    fn new(pool: &'p mut StringPool) -> Self {
        ModuleEmitter { pool, consts: Vec::new(), binds: Vec::new(), types: Vec::new() }
    }

    fn const_idx(&mut self, v: Value) -> Result<u16, CompileError> {
        if let Some(idx) = self.consts.iter().position(|c| values_eq(c, &v)) {
            return Ok(idx as u16);
        }
        let idx = self.consts.len();
        if idx > u16::MAX as usize {
            return Err(CompileError::TooManyConsts);
        }
        self.consts.push(v);
        Ok(idx as u16)
    }

    fn bind_idx(&mut self, sign: Symbol) -> Result<u16, CompileError> {
        if let Some(idx) = self.binds.iter().position(|s| *s == sign) {
            return Ok(idx as u16);
        }
        let idx = self.binds.len();
        if idx > u16::MAX as usize {
            return Err(CompileError::TooManyBinds);
        }
        self.binds.push(sign);
        Ok(idx as u16)
    }

    fn type_idx(&mut self, name: Symbol) -> Result<u16, CompileError> {
        if let Some(idx) = self.types.iter().position(|s| *s == name) {
            return Ok(idx as u16);
        }
        let idx = self.types.len();
        if idx > u16::MAX as usize {
            return Err(CompileError::TooManyTypes);
        }
        self.types.push(name);
        Ok(idx as u16)
    }

    fn concat_sign(&mut self) -> Symbol {
        self.pool.intern_str("__op_add(string,string)")
    }

    fn compile_func(&mut self, f: &RFunc, registry: &Registry) -> Result<Function, CompileError> {
        let mut code = Vec::new();
        for stmt in f.body.iter() {
            self.emit_stmt(&mut code, stmt, registry)?;
        }
        if code.last().copied() != Some(Opcode::Return as u8) {
            code.push(Opcode::Return as u8);
        }
        Ok(Function {
            sign: f.sign,
            ret_type: f.ret_type,
            arg_count: f.arg_count,
            body: FuncBody::Bytecode { code, local_count: f.local_count },
        })
    }

    fn emit_stmt(&mut self, code: &mut Vec<u8>, stmt: &RStmt, registry: &Registry) -> Result<(), CompileError> {
        match stmt {
            RStmt::Expr(e) => {
                self.emit_expr(code, e, registry)?;
                if !is_void_expr(e, registry) {
                    code.push(Opcode::Pop as u8);
                }
            }
            RStmt::Return(Some(e)) => {
                self.emit_expr(code, e, registry)?;
                code.push(Opcode::Return as u8);
            }
            RStmt::Return(None) => {
                code.push(Opcode::Return as u8);
            }
            RStmt::If { cond, then_branch, else_branch } => {
                self.emit_expr(code, cond, registry)?;
                let false_jump = emit_jump_placeholder(code, Opcode::BranchIfN);
                self.emit_stmt(code, then_branch, registry)?;
                if let Some(else_b) = else_branch {
                    let end_jump = emit_jump_placeholder(code, Opcode::Branch);
                    patch_jump(code, false_jump)?;
                    self.emit_stmt(code, else_b, registry)?;
                    patch_jump(code, end_jump)?;
                } else {
                    patch_jump(code, false_jump)?;
                }
            }
            RStmt::While { cond, body } => {
                let loop_start = code.len();
                self.emit_expr(code, cond, registry)?;
                let exit_jump = emit_jump_placeholder(code, Opcode::BranchIfN);
                self.emit_stmt(code, body, registry)?;
                emit_jump_to(code, Opcode::Branch, loop_start)?;
                patch_jump(code, exit_jump)?;
            }
            RStmt::Do { body, cond } => {
                let loop_start = code.len();
                self.emit_stmt(code, body, registry)?;
                self.emit_expr(code, cond, registry)?;
                emit_jump_to(code, Opcode::BranchIf, loop_start)?;
            }
            RStmt::Decl { idx, init } => {
                if let Some(e) = init {
                    self.emit_expr(code, e, registry)?;
                    code.push(Opcode::StoreLocal as u8);
                    code.push(idx.0);
                }
            }
            RStmt::Block(stmts) => {
                for s in stmts.iter() {
                    self.emit_stmt(code, s, registry)?;
                }
            }
        }
        Ok(())
    }

    fn emit_expr(&mut self, code: &mut Vec<u8>, expr: &RExpr, registry: &Registry) -> Result<(), CompileError> {
        match expr {
            RExpr::LoadLocal(idx) => {
                code.push(Opcode::LoadLocal as u8);
                code.push(idx.0);
            }
            RExpr::LoadArg(idx) => {
                code.push(Opcode::LoadArg as u8);
                code.push(idx.0);
            }
            RExpr::LoadField { primary, field } => {
                self.emit_expr(code, primary, registry)?;
                code.push(Opcode::LoadField as u8);
                code.push(field.0);
            }
            RExpr::ConstBool(b) => self.emit_const(code, Value::Bool(*b))?,
            RExpr::ConstInt(i) => self.emit_const(code, Value::Int(*i))?,
            RExpr::ConstFloat(f) => self.emit_const(code, Value::Float(*f))?,
            RExpr::ConstStr(s) => self.emit_const(code, Value::Str(*s))?,
            RExpr::StrInterp(parts) => self.emit_str_interp(code, parts, registry)?,
            RExpr::Call { sign, args, .. } => {
                for a in args.iter() {
                    self.emit_expr(code, a, registry)?;
                }
                let idx = self.bind_idx(*sign)?;
                code.push(Opcode::Call as u8);
                push_u16(code, idx);
            }
            RExpr::Construct { type_name, args, .. } => {
                for a in args.iter() {
                    self.emit_expr(code, a, registry)?;
                }
                let tidx = self.type_idx(*type_name)?;
                code.push(Opcode::New as u8);
                code.push(args.len() as u8);
                push_u16(code, tidx);
            }
            RExpr::Cond { cond, then_expr, else_expr } => {
                self.emit_expr(code, cond, registry)?;
                let false_jump = emit_jump_placeholder(code, Opcode::BranchIfN);
                self.emit_expr(code, then_expr, registry)?;
                let end_jump = emit_jump_placeholder(code, Opcode::Branch);
                patch_jump(code, false_jump)?;
                self.emit_expr(code, else_expr, registry)?;
                patch_jump(code, end_jump)?;
            }
            RExpr::StoreLocal { idx, rhs } => {
                self.emit_expr(code, rhs, registry)?;
                code.push(Opcode::StoreLocal as u8);
                code.push(idx.0);
            }
            RExpr::StoreArg { idx, rhs } => {
                self.emit_expr(code, rhs, registry)?;
                code.push(Opcode::StoreArg as u8);
                code.push(idx.0);
            }
            RExpr::StoreField { primary, field, rhs } => {
                // `store_field` pops object-then-value, so push the
                // value first and the object last.
                self.emit_expr(code, rhs, registry)?;
                self.emit_expr(code, primary, registry)?;
                code.push(Opcode::StoreField as u8);
                code.push(field.0);
            }
        }
        Ok(())
    }

    fn emit_const(&mut self, code: &mut Vec<u8>, v: Value) -> Result<(), CompileError> {
        let idx = self.const_idx(v)?;
        code.push(Opcode::LoadConst as u8);
        push_u16(code, idx);
        Ok(())
    }

    fn emit_str_interp(&mut self, code: &mut Vec<u8>, parts: &[StrInterpPart], registry: &Registry) -> Result<(), CompileError> {
        for (i, part) in parts.iter().enumerate() {
            self.emit_expr(code, part.expr, registry)?;
            if let Some(conv) = part.conversion {
                let idx = self.bind_idx(conv)?;
                code.push(Opcode::Call as u8);
                push_u16(code, idx);
            }
            // The running concatenation sits under this part's value on
            // the stack, so `__op_add` only has both operands once a
            // prior part has already pushed something to combine with.
            if i > 0 {
                let concat = self.concat_sign();
                let idx = self.bind_idx(concat)?;
                code.push(Opcode::Call as u8);
                push_u16(code, idx);
            }
        }
        Ok(())
    }
}

fn is_void_expr(e: &RExpr, registry: &Registry) -> bool {
    match e {
        RExpr::StoreLocal { .. } | RExpr::StoreArg { .. } | RExpr::StoreField { .. } => true,
        RExpr::Call { sign, .. } => registry.find_func(*sign).and_then(|f| f.ret_type).is_none(),
        _ => false,
    }
}

fn values_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

fn push_u16(code: &mut Vec<u8>, v: u16) {
    code.push((v >> 8) as u8);
    code.push(v as u8);
}

/// Emits the jump opcode with a placeholder operand and returns the
/// offset of that operand for [`patch_jump`] to fill in later.
fn emit_jump_placeholder(code: &mut Vec<u8>, op: Opcode) -> usize {
    code.push(op as u8);
    let operand_at = code.len();
    push_u16(code, 0);
    operand_at
}

/// Patches a placeholder so the jump lands at the current end of `code`.
fn patch_jump(code: &mut Vec<u8>, operand_at: usize) -> Result<(), CompileError> {
    let target = code.len();
    let offset = target as isize - (operand_at + 2) as isize;
    let offset: i16 = offset.try_into().map_err(|_| CompileError::JumpTooFar)?;
    let bytes = (offset as u16).to_be_bytes();
    code[operand_at] = bytes[0];
    code[operand_at + 1] = bytes[1];
    Ok(())
}

/// Emits a jump opcode whose target is already known (a backward jump
/// to a loop's start).
fn emit_jump_to(code: &mut Vec<u8>, op: Opcode, target: usize) -> Result<(), CompileError> {
    code.push(op as u8);
    let operand_at = code.len();
    push_u16(code, 0);
    let offset = target as isize - (operand_at + 2) as isize;
    let offset: i16 = offset.try_into().map_err(|_| CompileError::JumpTooFar)?;
    let bytes = (offset as u16).to_be_bytes();
    code[operand_at] = bytes[0];
    code[operand_at + 1] = bytes[1];
    Ok(())
}
