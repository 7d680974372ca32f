use crate::alloc::{Allocator, SystemAllocator};
use crate::error::LumenError;
use crate::linker;
use bumpalo::Bump;
use lumen_heap::{Heap, TypeId, Value};
use lumen_intern::{Symbol, StringPool};
use lumen_sem::{FuncSig, ModuleTable, Registry};
use lumen_vm::{CompiledModule, Program, Vm};
use std::path::Path;

/// Everything one embedding of the language needs: the string pool and
/// object heap every value lives in, every module registered so far
/// (native and scripted alike), and the interpreter that runs them.
///
/// `A` is the allocator-accounting hook; most embedders want
/// [`SystemAllocator`], the default produced by [`Context::new`].
pub struct Context<A: Allocator = SystemAllocator> {
    pool: StringPool,
    heap: Heap,
    program: Program,
    registry: Registry,
    type_ids: Vec<(Symbol, TypeId)>,
    next_type_id: u32,
    vm: Vm,
    allocator: A,
}

impl Context<SystemAllocator> {
    /// A context with the four standard native modules (`std`, `math`,
    /// `io`, `time`) already registered.
    pub fn new() -> Result<Self, LumenError> {
        Self::with_allocator(SystemAllocator::new())
    }
}

impl<A: Allocator> Context<A> {
    pub fn with_allocator(allocator: A) -> Result<Self, LumenError> {
        let mut ctx = Context {
            pool: StringPool::new(),
            heap: Heap::new(),
            program: Program::default(),
            registry: Registry::new(),
            type_ids: Vec::new(),
            next_type_id: 0,
            vm: Vm::new(),
            allocator,
        };
        for module in lumen_builtins::modules(&mut ctx.pool)? {
            ctx.register_native_module(module);
        }
        Ok(ctx)
    }

    pub fn pool(&self) -> &StringPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut StringPool {
        &mut self.pool
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    fn register_native_module(&mut self, module: CompiledModule) {
        let table = module_table(&module);
        self.registry.register(table);
        self.program.modules.push(module);
    }

    /// Registers a host-defined native module, callable by scripts the
    /// same way the standard `std`/`math`/`io`/`time` modules are.
    pub fn register_native(
        &mut self,
        name: Option<&str>,
        descs: Vec<lumen_native::NativeFuncDesc>,
    ) -> Result<(), LumenError> {
        let module = lumen_native::create_module(&mut self.pool, name, descs)?;
        self.register_native_module(module);
        Ok(())
    }

    /// Parses, resolves, compiles, and links `source` as a new module.
    /// Declares its struct types and links its bind table against every
    /// module registered so far (including itself, so recursive and
    /// sibling calls resolve).
    pub fn eval_string(&mut self, source: &str) -> Result<(), LumenError> {
        let arena = Bump::new();
        let parser_module = {
            let mut parser = lumen_par::Parser::new(&arena, source, &mut self.pool)?;
            parser.parse_module()?
        };

        for ty in parser_module.types.iter() {
            self.type_ids.push((ty.name, TypeId(self.next_type_id)));
            self.next_type_id += 1;
        }

        let resolved = lumen_sem::compile_module(&arena, &mut self.registry, &mut self.pool, &parser_module, None)?;
        let compiled = lumen_compile::compile_module(&resolved, &self.registry, &mut self.pool, None)?;

        let new_idx = self.program.modules.len();
        self.program.modules.push(compiled);
        linker::link_binds(&mut self.program, new_idx, &self.pool)?;
        linker::link_types(&mut self.program, new_idx, &self.type_ids, &self.pool)?;
        Ok(())
    }

    /// A missing file is a silent no-op: nothing is registered and no
    /// error is raised, matching the embedding contract for a host that
    /// probes an optional script path.
    pub fn eval_file(&mut self, path: &Path) -> Result<(), LumenError> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(LumenError::Io(path.display().to_string(), e)),
        };
        self.eval_string(&source)
    }

    /// Invokes the most recently registered function matching a mangled
    /// `name(t1,t2,...)` signature, most-recent module first.
    pub fn call(&mut self, sign: &str, args: &[Value]) -> Result<Option<Value>, LumenError> {
        let sym = self.pool.intern_str(sign);
        let last = self.program.modules.len().saturating_sub(1);
        let target = linker::find_func(&self.program, last, sym)
            .ok_or_else(|| LumenError::UnknownEntryPoint(sign.to_string()))?;
        let arg_count = self.program.modules[target.module as usize].funcs[target.func as usize].arg_count;
        if args.len() != arg_count as usize {
            return Err(LumenError::ArityMismatch(sign.to_string(), arg_count, args.len()));
        }
        let result = self
            .vm
            .invoke(&self.program, &mut self.heap, &mut self.pool, target.module, target.func, args)?;
        Ok(result)
    }
}

fn module_table(module: &CompiledModule) -> ModuleTable {
    let mut table = ModuleTable::new(module.name);
    for f in module.funcs.iter() {
        table.funcs.push(FuncSig { sign: f.sign, ret_type: f.ret_type, arg_count: f.arg_count });
    }
    table
}
