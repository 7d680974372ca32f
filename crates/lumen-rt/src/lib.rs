//! The embeddable runtime: parses, resolves, compiles, links, and runs
//! scripts against a [`Context`] that already carries the standard
//! native modules.

pub mod alloc;
pub mod context;
pub mod error;
pub mod linker;

pub use alloc::{Allocator, SystemAllocator, TrackingAllocator};
pub use context::Context;
pub use error::LumenError;
