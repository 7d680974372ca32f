//! Composite object storage.
//!
//! Objects are allocated in a flat backing store indexed by
//! [`ObjHandle`], the same stable-index-plus-refcount shape
//! `lumen-intern`'s `StringPool` uses for strings. There is no cycle
//! collector: field types form a DAG by construction (a struct
//! declaration cannot name itself as a direct or indirect field, see
//! `lumen-sem`), so releasing an object's reference-typed fields
//! recursively on refcount-zero can never walk into a cycle.

use crate::value::Value;
use lumen_intern::{StringPool, Symbol};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjHandle(u32);

impl fmt::Display for ObjHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

struct Slot {
    type_id: TypeId,
    fields: Box<[Value]>,
    refcount: u32,
}

/// Owns every live composite object. One instance lives per
/// [`lumen_rt::Context`], alongside the context's `StringPool`.
pub struct Heap {
    slots: Vec<Option<Slot>>,
    free_list: Vec<u32>,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocate a new object with refcount 1, owning `fields`.
    pub fn create(&mut self, type_id: TypeId, fields: Vec<Value>) -> ObjHandle {
        let slot = Some(Slot {
            type_id,
            fields: fields.into_boxed_slice(),
            refcount: 1,
        });
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = slot;
            ObjHandle(idx)
        } else {
            self.slots.push(slot);
            ObjHandle((self.slots.len() - 1) as u32)
        }
    }

    pub fn type_of(&self, handle: ObjHandle) -> TypeId {
        self.slot(handle).type_id
    }

    pub fn field(&self, handle: ObjHandle, index: usize) -> Value {
        self.slot(handle).fields[index]
    }

    pub fn set_field(&mut self, handle: ObjHandle, index: usize, value: Value) {
        self.slot_mut(handle).fields[index] = value;
    }

    pub fn field_count(&self, handle: ObjHandle) -> usize {
        self.slot(handle).fields.len()
    }

    pub fn refcount(&self, handle: ObjHandle) -> u32 {
        self.slot(handle).refcount
    }

    pub fn retain(&mut self, handle: ObjHandle) {
        self.slot_mut(handle).refcount += 1;
    }

    /// Decrement `handle`'s refcount; at zero, release every
    /// reference-typed field (recursively for nested objects, via the
    /// pool for interned strings) and return the slot to the free list.
    pub fn release(&mut self, handle: ObjHandle, pool: &mut StringPool) {
        let drop_now = {
            let slot = self.slot_mut(handle);
            slot.refcount -= 1;
            slot.refcount == 0
        };
        if !drop_now {
            return;
        }
        let fields = self.slots[handle.0 as usize].take().unwrap().fields;
        self.free_list.push(handle.0);
        for value in fields.iter() {
            match value {
                Value::Str(sym) if !sym.is_null() => pool.release(*sym),
                Value::Obj(Some(child)) => self.release(*child, pool),
                _ => {}
            }
        }
    }

    pub fn clone_symbols_and_retain(&mut self, fields: &[Value], pool: &mut StringPool) {
        for value in fields {
            match value {
                Value::Str(sym) if !sym.is_null() => {
                    pool.clone_handle(*sym);
                }
                Value::Obj(Some(child)) => self.retain(*child),
                _ => {}
            }
        }
    }

    fn slot(&self, handle: ObjHandle) -> &Slot {
        self.slots[handle.0 as usize]
            .as_ref()
            .expect("dangling object handle")
    }

    fn slot_mut(&mut self, handle: ObjHandle) -> &mut Slot {
        self.slots[handle.0 as usize]
            .as_mut()
            .expect("dangling object handle")
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-type field layout, used by the compiler to emit `load_field`/
/// `store_field` offsets and by the heap to know field count up front.
#[derive(Debug, Clone)]
pub struct TypeLayout {
    pub name: Symbol,
    pub field_count: usize,
}
