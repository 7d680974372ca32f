//! `lumen-util` — shared span, diagnostic, and index types.
//!
//! This crate sits at the bottom of the workspace's dependency graph:
//! every compiler phase and the runtime depend on it, it depends on
//! nothing in-tree.

pub mod diagnostic;
pub mod index;
pub mod span;

pub use diagnostic::{Diagnostic, Severity};
pub use index::{BindIdx, ConstIdx, FieldIdx, LocalIdx, ParamIdx};
pub use span::Span;
