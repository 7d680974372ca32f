use lumen_intern::StringPool;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn interning_twice_yields_same_handle(s: String) -> bool {
    let mut pool = StringPool::new();
    let a = pool.intern(s.as_bytes());
    let b = pool.intern(s.as_bytes());
    a == b
}

#[quickcheck]
fn interned_bytes_round_trip(s: String) -> bool {
    let mut pool = StringPool::new();
    let sym = pool.intern(s.as_bytes());
    pool.as_bytes(sym) == s.as_bytes()
}

#[quickcheck]
fn release_then_reintern_round_trips_bytes(s: String) -> bool {
    if s.is_empty() {
        return true;
    }
    let mut pool = StringPool::new();
    let a = pool.intern(s.as_bytes());
    pool.release(a);
    let b = pool.intern(s.as_bytes());
    pool.as_bytes(b) == s.as_bytes()
}

#[test]
fn empty_bytes_intern_to_null() {
    let mut pool = StringPool::new();
    let sym = pool.intern(b"");
    assert!(sym.is_null());
    assert_eq!(pool.as_bytes(sym), b"");
}

#[test]
fn distinct_strings_get_distinct_handles() {
    let mut pool = StringPool::new();
    let a = pool.intern(b"alpha");
    let b = pool.intern(b"beta");
    assert_ne!(a, b);
}

#[test]
fn clone_handle_increments_refcount() {
    let mut pool = StringPool::new();
    let a = pool.intern(b"shared");
    assert_eq!(pool.refcount(a), 1);
    let b = pool.clone_handle(a);
    assert_eq!(a, b);
    assert_eq!(pool.refcount(a), 2);
}

#[test]
fn release_to_zero_frees_the_slot() {
    let mut pool = StringPool::new();
    let a = pool.intern(b"transient");
    pool.release(a);
    assert_eq!(pool.refcount(a), 0);
    assert_eq!(pool.as_bytes(a), b"");
}

#[test]
fn concat_builds_expected_bytes() {
    let mut pool = StringPool::new();
    let a = pool.intern(b"foo");
    let b = pool.intern(b"bar");
    let c = pool.concat(a, b);
    assert_eq!(pool.as_bytes(c), b"foobar");
}

#[test]
fn join_concatenates_in_order() {
    let mut pool = StringPool::new();
    let parts: Vec<_> = ["a", "b", "c"].iter().map(|s| pool.intern_str(s)).collect();
    let joined = pool.join(&parts);
    assert_eq!(pool.as_str(joined), "abc");
}

#[test]
fn load_factor_stays_bounded_under_growth() {
    let mut pool = StringPool::new();
    for i in 0..500 {
        pool.intern(format!("sym-{i}").as_bytes());
    }
    assert!(pool.load_factor() <= 0.75);
}

#[test]
fn handles_survive_table_growth() {
    let mut pool = StringPool::new();
    let first = pool.intern(b"first");
    for i in 0..1000 {
        pool.intern(format!("filler-{i}").as_bytes());
    }
    assert_eq!(pool.as_bytes(first), b"first");
}
