use crate::error::VmError;
use crate::function::FuncBody;
use crate::module::Program;
use crate::opcode::Opcode;
use lumen_heap::{Heap, Value};
use lumen_intern::StringPool;

/// Recursion limit mirroring a real interpreter's guard against
/// unbounded native-stack recursion from user script recursion.
const MAX_CALL_DEPTH: usize = 512;

/// A stack-based interpreter. One `Vm` can run any number of
/// `invoke()` calls against the same `Program`; its operand stack is
/// reused (and cleared) between top-level invocations but grows and
/// shrinks with every nested call in between, exactly like a single
/// native call stack would.
pub struct Vm {
    stack: Vec<Value>,
    depth: usize,
}

impl Vm {
    pub fn new() -> Self {
        Vm { stack: Vec::new(), depth: 0 }
    }

    /// Invoke `program.modules[module_idx].funcs[func_idx]` with
    /// `args` pushed as its argument slots. The stack is empty before
    /// and after every top-level call.
    pub fn invoke(
        &mut self,
        program: &Program,
        heap: &mut Heap,
        pool: &mut StringPool,
        module_idx: u32,
        func_idx: u32,
        args: &[Value],
    ) -> Result<Option<Value>, VmError> {
        let base = self.stack.len();
        self.stack.extend_from_slice(args);
        let result = self.invoke_int(program, heap, pool, module_idx, func_idx);
        if let Ok(ret) = &result {
            debug_assert_eq!(self.stack.len(), base + ret.is_some() as usize);
        }
        result
    }

    fn invoke_int(
        &mut self,
        program: &Program,
        heap: &mut Heap,
        pool: &mut StringPool,
        module_idx: u32,
        func_idx: u32,
    ) -> Result<Option<Value>, VmError> {
        self.depth += 1;
        if self.depth > MAX_CALL_DEPTH {
            self.depth -= 1;
            return Err(VmError::StackOverflow);
        }
        let module = &program.modules[module_idx as usize];
        let func = &module.funcs[func_idx as usize];
        let args_base = self.stack.len() - func.arg_count as usize;

        let result = match &func.body {
            FuncBody::Native(native) => {
                let r = native(heap, pool, &self.stack[args_base..]);
                r.map(|opt| {
                    self.stack.truncate(args_base);
                    if let Some(v) = opt {
                        self.stack.push(v);
                    }
                    opt
                })
            }
            FuncBody::Bytecode { code, local_count } => {
                for _ in 0..*local_count {
                    self.stack.push(Value::default());
                }
                self.run(program, heap, pool, module_idx, func_idx, code, args_base)
            }
        };
        self.depth -= 1;
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn run(
        &mut self,
        program: &Program,
        heap: &mut Heap,
        pool: &mut StringPool,
        module_idx: u32,
        func_idx: u32,
        code: &[u8],
        args_base: usize,
    ) -> Result<Option<Value>, VmError> {
        let module = &program.modules[module_idx as usize];
        let func = &module.funcs[func_idx as usize];
        let locals_base = args_base + func.arg_count as usize;
        let mut ip = 0usize;

        loop {
            let op = read_u8(code, &mut ip)?;
            let op = Opcode::from_u8(op).ok_or(VmError::InvalidOpcode(op))?;
            match op {
                Opcode::LoadConst => {
                    let idx = read_u16(code, &mut ip)?;
                    self.stack.push(module.consts[idx as usize]);
                }
                Opcode::LoadArg => {
                    let idx = read_u8(code, &mut ip)? as usize;
                    self.stack.push(self.stack[args_base + idx]);
                }
                Opcode::StoreArg => {
                    let idx = read_u8(code, &mut ip)? as usize;
                    let v = self.stack.pop().expect("operand stack underflow");
                    self.stack[args_base + idx] = v;
                }
                Opcode::LoadLocal => {
                    let idx = read_u8(code, &mut ip)? as usize;
                    self.stack.push(self.stack[locals_base + idx]);
                }
                Opcode::StoreLocal => {
                    let idx = read_u8(code, &mut ip)? as usize;
                    let v = self.stack.pop().expect("operand stack underflow");
                    self.stack[locals_base + idx] = v;
                }
                Opcode::LoadField => {
                    let idx = read_u8(code, &mut ip)? as usize;
                    let top = self.stack.len() - 1;
                    if let Value::Obj(Some(h)) = self.stack[top] {
                        self.stack[top] = heap.field(h, idx);
                    }
                }
                Opcode::StoreField => {
                    let idx = read_u8(code, &mut ip)? as usize;
                    let obj = self.stack.pop().expect("operand stack underflow");
                    let val = self.stack.pop().expect("operand stack underflow");
                    if let Value::Obj(Some(h)) = obj {
                        heap.set_field(h, idx, val);
                    }
                }
                Opcode::Call => {
                    let idx = read_u16(code, &mut ip)? as usize;
                    let target = module.binds[idx].ok_or(VmError::UnresolvedBind(idx as u16))?;
                    self.invoke_int(program, heap, pool, target.module, target.func)?;
                }
                Opcode::Branch => {
                    let off = read_i16(code, &mut ip)?;
                    ip = (ip as isize + off as isize) as usize;
                }
                Opcode::BranchIf => {
                    let off = read_i16(code, &mut ip)?;
                    let v = self.stack.pop().expect("operand stack underflow");
                    if v.truthy() {
                        ip = (ip as isize + off as isize) as usize;
                    }
                }
                Opcode::BranchIfN => {
                    let off = read_i16(code, &mut ip)?;
                    let v = self.stack.pop().expect("operand stack underflow");
                    if !v.truthy() {
                        ip = (ip as isize + off as isize) as usize;
                    }
                }
                Opcode::Return => {
                    return if func.ret_type.is_some() {
                        let v = self.stack.pop().expect("operand stack underflow");
                        self.stack.truncate(args_base);
                        self.stack.push(v);
                        Ok(Some(v))
                    } else {
                        self.stack.truncate(args_base);
                        Ok(None)
                    };
                }
                Opcode::Pop => {
                    self.stack.pop();
                }
                Opcode::New => {
                    let count = read_u8(code, &mut ip)? as usize;
                    let type_idx = read_u16(code, &mut ip)? as usize;
                    let type_id = module.types[type_idx].ok_or(VmError::UnresolvedBind(type_idx as u16))?;
                    let fields = self.stack.split_off(self.stack.len() - count);
                    heap.clone_symbols_and_retain(&fields, pool);
                    let handle = heap.create(type_id, fields);
                    self.stack.push(Value::Obj(Some(handle)));
                }
            }
        }
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

fn read_u8(code: &[u8], ip: &mut usize) -> Result<u8, VmError> {
    let b = *code.get(*ip).ok_or(VmError::Truncated)?;
    *ip += 1;
    Ok(b)
}

fn read_u16(code: &[u8], ip: &mut usize) -> Result<u16, VmError> {
    let hi = read_u8(code, ip)? as u16;
    let lo = read_u8(code, ip)? as u16;
    Ok((hi << 8) | lo)
}

fn read_i16(code: &[u8], ip: &mut usize) -> Result<i16, VmError> {
    Ok(read_u16(code, ip)? as i16)
}
