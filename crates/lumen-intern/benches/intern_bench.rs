use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lumen_intern::StringPool;

fn intern_fresh(c: &mut Criterion) {
    c.bench_function("intern_fresh_strings", |b| {
        b.iter(|| {
            let mut pool = StringPool::new();
            for i in 0..1000 {
                black_box(pool.intern(format!("sym-{i}").as_bytes()));
            }
        })
    });
}

fn intern_repeated(c: &mut Criterion) {
    let mut pool = StringPool::new();
    let sym = pool.intern(b"hot_path_identifier");
    black_box(sym);
    c.bench_function("intern_repeated_hit", |b| {
        b.iter(|| black_box(pool.intern(b"hot_path_identifier")))
    });
}

criterion_group!(benches, intern_fresh, intern_repeated);
criterion_main!(benches);
