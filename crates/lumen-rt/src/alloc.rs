//! Object-allocation accounting.
//!
//! Every allocator hook the embedding runtime this one replaces routed
//! through a single `ctx->alloc` callback shared by the AST arena, the
//! string pool, and the object heap. Rust's arena (`bumpalo`) and
//! collections don't expose a pluggable allocator that cleanly, so this
//! narrows the same idea to what's actually useful to an embedder:
//! counting how many heap objects are live and how many have ever been
//! allocated, for diagnostics and memory limits.

use std::sync::atomic::{AtomicUsize, Ordering};

pub trait Allocator: Send + Sync {
    fn on_object_created(&self);
    fn on_object_released(&self);
    fn live_objects(&self) -> usize;
    fn total_allocated(&self) -> usize;
}

/// The default: plain counters, no limit enforcement.
#[derive(Debug, Default)]
pub struct SystemAllocator {
    live: AtomicUsize,
    total: AtomicUsize,
}

impl SystemAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Allocator for SystemAllocator {
    fn on_object_created(&self) {
        self.live.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    fn on_object_released(&self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }

    fn live_objects(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    fn total_allocated(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }
}

/// Wraps another allocator and additionally remembers the high-water
/// mark of live objects, for embedders who want to cap script memory
/// use without paying for a full profiler.
pub struct TrackingAllocator<A: Allocator> {
    inner: A,
    peak: AtomicUsize,
}

impl<A: Allocator> TrackingAllocator<A> {
    pub fn new(inner: A) -> Self {
        TrackingAllocator { inner, peak: AtomicUsize::new(0) }
    }

    pub fn peak_live_objects(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }
}

impl<A: Allocator> Allocator for TrackingAllocator<A> {
    fn on_object_created(&self) {
        self.inner.on_object_created();
        let live = self.inner.live_objects();
        self.peak.fetch_max(live, Ordering::Relaxed);
    }

    fn on_object_released(&self) {
        self.inner.on_object_released();
    }

    fn live_objects(&self) -> usize {
        self.inner.live_objects()
    }

    fn total_allocated(&self) -> usize {
        self.inner.total_allocated()
    }
}
