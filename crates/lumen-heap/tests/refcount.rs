use lumen_heap::{Heap, TypeId, Value};
use lumen_intern::StringPool;

#[test]
fn create_starts_at_refcount_one() {
    let mut heap = Heap::new();
    let handle = heap.create(TypeId(0), vec![Value::Int(1)]);
    assert_eq!(heap.refcount(handle), 1);
}

#[test]
fn retain_then_release_leaves_object_alive() {
    let mut pool = StringPool::new();
    let mut heap = Heap::new();
    let handle = heap.create(TypeId(0), vec![Value::Int(42)]);
    heap.retain(handle);
    assert_eq!(heap.refcount(handle), 2);
    heap.release(handle, &mut pool);
    assert_eq!(heap.refcount(handle), 1);
}

#[test]
fn release_frees_nested_string_field() {
    let mut pool = StringPool::new();
    let mut heap = Heap::new();
    let sym = pool.intern(b"owned by object");
    assert_eq!(pool.refcount(sym), 1);
    let handle = heap.create(TypeId(0), vec![Value::Str(sym)]);
    heap.release(handle, &mut pool);
    assert_eq!(pool.refcount(sym), 0);
}

#[test]
fn release_recurses_into_nested_object_fields() {
    let mut pool = StringPool::new();
    let mut heap = Heap::new();
    let inner = heap.create(TypeId(1), vec![Value::Int(7)]);
    let outer = heap.create(TypeId(0), vec![Value::Obj(Some(inner))]);
    heap.release(outer, &mut pool);
    // `inner`'s slot was freed by the recursive release, so it gets
    // reused by the very next allocation.
    let reused = heap.create(TypeId(2), vec![Value::Int(9)]);
    assert_eq!(format!("{reused}"), format!("{inner}"));
}

#[test]
fn fields_round_trip() {
    let mut heap = Heap::new();
    let handle = heap.create(TypeId(0), vec![Value::Int(1), Value::Bool(true)]);
    assert_eq!(heap.field(handle, 0), Value::Int(1));
    assert_eq!(heap.field(handle, 1), Value::Bool(true));
    heap.set_field(handle, 0, Value::Int(99));
    assert_eq!(heap.field(handle, 0), Value::Int(99));
}

#[test]
fn freed_slots_are_reused() {
    let mut pool = StringPool::new();
    let mut heap = Heap::new();
    let a = heap.create(TypeId(0), vec![Value::Int(1)]);
    heap.release(a, &mut pool);
    let b = heap.create(TypeId(0), vec![Value::Int(2)]);
    assert_eq!(heap.field(b, 0), Value::Int(2));
}
