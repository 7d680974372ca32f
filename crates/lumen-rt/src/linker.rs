//! Resolves a freshly compiled module's bind table and type table
//! against every module already registered, the same way the runtime
//! this one replaces patches each bind's function pointer in at
//! registration time rather than re-resolving a signature on every
//! call: `fin_mod_register` walks its own module first (so sibling and
//! self-recursive calls resolve), then every previously registered
//! module, newest first.

use crate::error::LumenError;
use lumen_intern::{StringPool, Symbol};
use lumen_vm::{FuncRef, Program};

pub fn link_binds(program: &mut Program, new_idx: usize, pool: &StringPool) -> Result<(), LumenError> {
    let bind_count = program.modules[new_idx].bind_signs.len();
    for i in 0..bind_count {
        let sign = program.modules[new_idx].bind_signs[i];
        match find_func(program, new_idx, sign) {
            Some(fr) => program.modules[new_idx].binds[i] = Some(fr),
            None => {
                return Err(LumenError::UnresolvedBind(module_label(program, new_idx, pool), pool.as_str(sign).to_string()));
            }
        }
    }
    Ok(())
}

pub fn link_types(
    program: &mut Program,
    new_idx: usize,
    type_ids: &[(Symbol, lumen_heap::TypeId)],
    pool: &StringPool,
) -> Result<(), LumenError> {
    let type_count = program.modules[new_idx].type_names.len();
    for i in 0..type_count {
        let name = program.modules[new_idx].type_names[i];
        match type_ids.iter().rev().find(|(n, _)| *n == name) {
            Some((_, id)) => program.modules[new_idx].types[i] = Some(*id),
            None => {
                return Err(LumenError::UnresolvedType(module_label(program, new_idx, pool), pool.as_str(name).to_string()));
            }
        }
    }
    Ok(())
}

/// Find which `(module, func)` a mangled signature resolves to, walking
/// from `search_from` down to the first registered module.
pub fn find_func(program: &Program, search_from: usize, sign: Symbol) -> Option<FuncRef> {
    for m in (0..=search_from).rev() {
        if let Some(f_idx) = program.modules[m].funcs.iter().position(|f| f.sign == sign) {
            return Some(FuncRef { module: m as u32, func: f_idx as u32 });
        }
    }
    None
}

fn module_label(program: &Program, idx: usize, pool: &StringPool) -> String {
    match program.modules[idx].name {
        Some(name) => format!("#{idx}:{}", pool.as_str(name)),
        None => format!("#{idx}:<anonymous>"),
    }
}
