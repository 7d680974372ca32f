//! Resolved, arena-allocated IR. Every name in a [`crate::ast`]-shaped
//! tree has been turned into a slot index or a mangled call signature
//! by the time a tree reaches this form — `lumen-compile` never looks
//! up an identifier, it only emits opcodes for what's already here.
//!
//! Unary and binary operators are not distinct IR nodes: both resolve
//! to a plain [`RExpr::Call`] against their mangled `__op_*` signature,
//! the same way the call-by-signature bind table treats them at
//! runtime.

use lumen_intern::Symbol;
use lumen_util::index::{FieldIdx, LocalIdx, ParamIdx};
use lumen_util::Span;

#[derive(Debug, Clone, Copy)]
pub struct StrInterpPart<'a> {
    pub expr: &'a RExpr<'a>,
    /// `Some(sign)` when this part's resolved type isn't already
    /// `string` and needs a `string(T)` conversion call first.
    pub conversion: Option<Symbol>,
}

#[derive(Debug, Clone, Copy)]
pub enum RExpr<'a> {
    LoadLocal(LocalIdx),
    LoadArg(ParamIdx),
    LoadField {
        primary: &'a RExpr<'a>,
        field: FieldIdx,
    },
    ConstBool(bool),
    ConstInt(i64),
    ConstFloat(f64),
    ConstStr(Symbol),
    StrInterp(&'a [StrInterpPart<'a>]),
    /// A call resolved by mangled signature — covers user/native
    /// function calls and desugared unary/binary operators alike.
    Call {
        sign: Symbol,
        args: &'a [RExpr<'a>],
        span: Span,
    },
    Construct {
        type_name: Symbol,
        args: &'a [RExpr<'a>],
        span: Span,
    },
    Cond {
        cond: &'a RExpr<'a>,
        then_expr: &'a RExpr<'a>,
        else_expr: &'a RExpr<'a>,
    },
    StoreLocal {
        idx: LocalIdx,
        rhs: &'a RExpr<'a>,
    },
    StoreArg {
        idx: ParamIdx,
        rhs: &'a RExpr<'a>,
    },
    StoreField {
        primary: &'a RExpr<'a>,
        field: FieldIdx,
        rhs: &'a RExpr<'a>,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum RStmt<'a> {
    Expr(&'a RExpr<'a>),
    Return(Option<&'a RExpr<'a>>),
    If {
        cond: &'a RExpr<'a>,
        then_branch: &'a RStmt<'a>,
        else_branch: Option<&'a RStmt<'a>>,
    },
    While {
        cond: &'a RExpr<'a>,
        body: &'a RStmt<'a>,
    },
    /// Not present in the language this one is descended from — a
    /// `do { } while (cond);` loop runs `body` once unconditionally,
    /// then re-checks `cond` the way `while` does.
    Do {
        body: &'a RStmt<'a>,
        cond: &'a RExpr<'a>,
    },
    Decl {
        idx: LocalIdx,
        init: Option<&'a RExpr<'a>>,
    },
    Block(&'a [RStmt<'a>]),
}

#[derive(Debug, Clone)]
pub struct RFunc<'a> {
    pub sign: Symbol,
    pub ret_type: Option<Symbol>,
    pub arg_count: u8,
    pub local_count: u8,
    pub body: &'a [RStmt<'a>],
}

#[derive(Debug, Clone)]
pub struct RModule<'a> {
    pub funcs: Vec<RFunc<'a>>,
}
