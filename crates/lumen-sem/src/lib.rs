//! Semantic resolution: module tables, type inference, signature
//! mangling, and lowering the parser's AST into a resolved IR that
//! `lumen-compile` can emit bytecode from without any further name
//! lookups.

pub mod error;
pub mod ir;
pub mod resolve;
pub mod types;

pub use error::SemaError;
pub use ir::{RExpr, RFunc, RModule, RStmt, StrInterpPart};
pub use resolve::compile_module;
pub use types::{EnumDef, FuncSig, ModuleTable, Registry, TypeDef, TypeId};
