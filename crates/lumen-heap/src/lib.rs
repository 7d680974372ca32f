//! The value representation and composite-object store.

pub mod obj;
pub mod value;

pub use obj::{Heap, ObjHandle, TypeId, TypeLayout};
pub use value::Value;
