//! Module-level declarations: struct layouts, enum values, and function
//! signatures, keyed the same way the bytecode's bind table keys native
//! and compiled functions — by a single mangled signature string.

use lumen_intern::{StringPool, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: Symbol,
    /// `(field name, field type name)`, in declaration order — field
    /// index in this vec *is* the `FieldIdx` used by `load_field`/
    /// `store_field`.
    pub fields: Vec<(Symbol, Symbol)>,
}

impl TypeDef {
    pub fn field_index(&self, name: Symbol) -> Option<usize> {
        self.fields.iter().position(|(n, _)| *n == name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: Symbol,
    /// `(value name, discriminant)` — discriminants default to the
    /// previous value's plus one, starting at 0, the same as a C enum.
    pub values: Vec<(Symbol, i64)>,
}

impl EnumDef {
    pub fn discriminant(&self, name: Symbol) -> Option<i64> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

/// A function's call signature: `name(t1,t2,...)` or
/// `Module.name(t1,t2,...)`, already mangled and interned.
#[derive(Debug, Clone)]
pub struct FuncSig {
    pub sign: Symbol,
    pub ret_type: Option<Symbol>,
    pub arg_count: u8,
}

/// One compiled or native module's declarations.
#[derive(Debug, Clone, Default)]
pub struct ModuleTable {
    pub name: Option<Symbol>,
    pub types: Vec<TypeDef>,
    pub enums: Vec<EnumDef>,
    pub funcs: Vec<FuncSig>,
}

impl ModuleTable {
    pub fn new(name: Option<Symbol>) -> Self {
        ModuleTable { name, ..Default::default() }
    }

    pub fn find_type(&self, name: Symbol) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn find_enum(&self, name: Symbol) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn find_func(&self, sign: Symbol) -> Option<&FuncSig> {
        self.funcs.iter().find(|f| f.sign == sign)
    }
}

/// Every module known at the point a new one is compiled, most
/// recently registered first — mirrors `fin_ctx`'s `mod` linked list,
/// which `fin_mod_find_func`/`fin_mod_resolve_field` walk to find
/// declarations from previously registered modules (native or
/// compiled) when the current module doesn't declare them itself.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: Vec<ModuleTable>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn register(&mut self, module: ModuleTable) {
        self.modules.insert(0, module);
    }

    pub fn find_func(&self, sign: Symbol) -> Option<&FuncSig> {
        self.modules.iter().find_map(|m| m.find_func(sign))
    }

    pub fn find_type(&self, name: Symbol) -> Option<&TypeDef> {
        self.modules.iter().find_map(|m| m.find_type(name))
    }

    pub fn find_enum(&self, name: Symbol) -> Option<&EnumDef> {
        self.modules.iter().find_map(|m| m.find_enum(name))
    }
}

pub fn builtin_type_name(pool: &mut StringPool, name: &str) -> Symbol {
    pool.intern_str(name)
}
