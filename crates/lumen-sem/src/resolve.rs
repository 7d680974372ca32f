//! Type resolution, signature mangling, and lowering from the parser's
//! AST to the resolved IR.
//!
//! Resolution re-derives an expression's type from scratch every time
//! a signature needs it (once while lowering the expression itself,
//! again whenever a parent node needs its operand's type to build
//! *its own* signature) rather than caching it — the same repeated
//! top-down walk the single-pass resolve-and-emit the bytecode
//! compiler does internally.

use crate::error::SemaError;
use crate::ir::{FieldIdx, RExpr, RFunc, RModule, RStmt, StrInterpPart};
use crate::types::{EnumDef, FuncSig, ModuleTable, Registry, TypeDef};
use bumpalo::collections::Vec as BVec;
use bumpalo::Bump;
use lumen_intern::{StringPool, Symbol};
use lumen_par::{self as ast, AssignOp, BinaryOp};
use lumen_util::index::{LocalIdx, ParamIdx};

struct Primitives {
    void: Symbol,
    string: Symbol,
}

impl Primitives {
    fn new(pool: &mut StringPool) -> Self {
        Primitives {
            void: pool.intern_str("void"),
            string: pool.intern_str("string"),
        }
    }
}

fn assign_op_to_binary(op: AssignOp) -> Option<BinaryOp> {
    match op {
        AssignOp::Assign => None,
        AssignOp::Add => Some(BinaryOp::Add),
        AssignOp::Sub => Some(BinaryOp::Sub),
        AssignOp::Mul => Some(BinaryOp::Mul),
        AssignOp::Div => Some(BinaryOp::Div),
        AssignOp::Mod => Some(BinaryOp::Mod),
        AssignOp::And => Some(BinaryOp::BAnd),
        AssignOp::Or => Some(BinaryOp::BOr),
        AssignOp::Xor => Some(BinaryOp::BXor),
        AssignOp::Shl => Some(BinaryOp::Shl),
        AssignOp::Shr => Some(BinaryOp::Shr),
    }
}

/// Per-function resolution state: the fixed-size local/parameter
/// tables the original keeps on its compiler struct, grown as `Decl`
/// statements are walked.
struct FuncCompiler {
    params: Vec<(Symbol, Symbol)>,
    locals: Vec<(Symbol, Symbol)>,
}

impl FuncCompiler {
    fn new() -> Self {
        FuncCompiler { params: Vec::new(), locals: Vec::new() }
    }

    fn find_local(&self, name: Symbol) -> Option<usize> {
        self.locals.iter().position(|(n, _)| *n == name)
    }

    fn find_param(&self, name: Symbol) -> Option<usize> {
        self.params.iter().position(|(n, _)| *n == name)
    }

    fn resolve_type<'a>(
        &self,
        registry: &Registry,
        pool: &mut StringPool,
        prim: &Primitives,
        expr: &ast::Expr<'a>,
    ) -> Result<Symbol, SemaError> {
        match expr {
            ast::Expr::Id { primary: None, name, span } => {
                if let Some(idx) = self.find_local(*name) {
                    return Ok(self.locals[idx].1);
                }
                if let Some(idx) = self.find_param(*name) {
                    return Ok(self.params[idx].1);
                }
                Err(SemaError::UnknownIdent(*span))
            }
            ast::Expr::Id { primary: Some(p), name, span } => {
                if let ast::Expr::Id { primary: None, name: enum_name, .. } = p {
                    if let Some(e) = registry.find_enum(*enum_name) {
                        return e
                            .discriminant(*name)
                            .map(|_| pool.intern_str("int"))
                            .ok_or_else(|| {
                                SemaError::UnknownField(
                                    *span,
                                    pool.as_str(*enum_name).to_string(),
                                    pool.as_str(*name).to_string(),
                                )
                            });
                    }
                }
                let primary_type = self.resolve_type(registry, pool, prim, p)?;
                let td = registry.find_type(primary_type).ok_or_else(|| {
                    SemaError::Unresolved(*span, pool.as_str(primary_type).to_string())
                })?;
                td.field_index(*name).map(|i| td.fields[i].1).ok_or_else(|| {
                    SemaError::UnknownField(
                        *span,
                        pool.as_str(primary_type).to_string(),
                        pool.as_str(*name).to_string(),
                    )
                })
            }
            ast::Expr::Bool(_, _) => Ok(pool.intern_str("bool")),
            ast::Expr::Int(_, _) => Ok(pool.intern_str("int")),
            ast::Expr::Float(_, _) => Ok(pool.intern_str("float")),
            ast::Expr::Str(_, _) | ast::Expr::StrInterp(_, _) => Ok(prim.string),
            ast::Expr::Unary { op, expr: inner, span } => {
                let t = self.resolve_type(registry, pool, prim, inner)?;
                let sign_str = format!("{}({})", op.mangled_name(), pool.as_str(t));
                let sign = pool.intern_str(&sign_str);
                registry
                    .find_func(sign)
                    .map(|f| f.ret_type.unwrap_or(prim.void))
                    .ok_or(SemaError::Unresolved(*span, sign_str))
            }
            ast::Expr::Binary { op, lhs, rhs, span } => {
                let lt = self.resolve_type(registry, pool, prim, lhs)?;
                let rt = self.resolve_type(registry, pool, prim, rhs)?;
                let sign_str =
                    format!("{}({},{})", op.mangled_name(), pool.as_str(lt), pool.as_str(rt));
                let sign = pool.intern_str(&sign_str);
                registry
                    .find_func(sign)
                    .map(|f| f.ret_type.unwrap_or(prim.void))
                    .ok_or(SemaError::Unresolved(*span, sign_str))
            }
            ast::Expr::Cond { then_expr, else_expr, span, .. } => {
                let a = self.resolve_type(registry, pool, prim, then_expr)?;
                let b = self.resolve_type(registry, pool, prim, else_expr)?;
                if a != b {
                    return Err(SemaError::CondTypeMismatch(
                        *span,
                        pool.as_str(a).to_string(),
                        pool.as_str(b).to_string(),
                    ));
                }
                Ok(a)
            }
            ast::Expr::Invoke { callee, args, span } => {
                let mut arg_types = Vec::with_capacity(args.len());
                for a in args.iter() {
                    arg_types.push(self.resolve_type(registry, pool, prim, a)?);
                }
                let sign_str = invoke_signature_string(callee, &arg_types, pool);
                let sign = pool.intern_str(&sign_str);
                if let Some(f) = registry.find_func(sign) {
                    return Ok(f.ret_type.unwrap_or(prim.void));
                }
                if let ast::Expr::Id { primary: None, name, .. } = callee {
                    if registry.find_type(*name).is_some() {
                        return Ok(*name);
                    }
                }
                Err(SemaError::Unresolved(*span, sign_str))
            }
            ast::Expr::Assign { .. } => Ok(prim.void),
        }
    }

    fn lower_expr<'a>(
        &mut self,
        arena: &'a Bump,
        registry: &Registry,
        pool: &mut StringPool,
        prim: &Primitives,
        expr: &ast::Expr<'a>,
    ) -> Result<&'a RExpr<'a>, SemaError> {
        let node = match expr {
            ast::Expr::Id { primary: None, name, span } => {
                if let Some(idx) = self.find_local(*name) {
                    RExpr::LoadLocal(LocalIdx(idx as u8))
                } else if let Some(idx) = self.find_param(*name) {
                    RExpr::LoadArg(ParamIdx(idx as u8))
                } else {
                    return Err(SemaError::UnknownIdent(*span));
                }
            }
            ast::Expr::Id { primary: Some(p), name, span } => {
                if let ast::Expr::Id { primary: None, name: enum_name, .. } = p {
                    if let Some(e) = registry.find_enum(*enum_name) {
                        let v = e.discriminant(*name).ok_or_else(|| {
                            SemaError::UnknownField(
                                *span,
                                pool.as_str(*enum_name).to_string(),
                                pool.as_str(*name).to_string(),
                            )
                        })?;
                        return Ok(arena.alloc(RExpr::ConstInt(v)));
                    }
                }
                let primary_ir = self.lower_expr(arena, registry, pool, prim, p)?;
                let primary_type = self.resolve_type(registry, pool, prim, p)?;
                let td = registry.find_type(primary_type).ok_or_else(|| {
                    SemaError::Unresolved(*span, pool.as_str(primary_type).to_string())
                })?;
                let field = td.field_index(*name).ok_or_else(|| {
                    SemaError::UnknownField(
                        *span,
                        pool.as_str(primary_type).to_string(),
                        pool.as_str(*name).to_string(),
                    )
                })?;
                RExpr::LoadField { primary: primary_ir, field: FieldIdx(field as u8) }
            }
            ast::Expr::Bool(b, _) => RExpr::ConstBool(*b),
            ast::Expr::Int(v, _) => RExpr::ConstInt(*v),
            ast::Expr::Float(v, _) => RExpr::ConstFloat(*v),
            ast::Expr::Str(s, _) => RExpr::ConstStr(*s),
            ast::Expr::StrInterp(parts, _) => {
                let mut out = BVec::new_in(arena);
                for part in parts.iter() {
                    let part_ir = self.lower_expr(arena, registry, pool, prim, part)?;
                    let part_ty = self.resolve_type(registry, pool, prim, part)?;
                    let conversion = if part_ty != prim.string {
                        let sign_str = format!("string({})", pool.as_str(part_ty));
                        let sign = pool.intern_str(&sign_str);
                        if registry.find_func(sign).is_none() {
                            return Err(SemaError::Unresolved(part.span(), sign_str));
                        }
                        Some(sign)
                    } else {
                        None
                    };
                    out.push(StrInterpPart { expr: part_ir, conversion });
                }
                RExpr::StrInterp(out.into_bump_slice())
            }
            ast::Expr::Unary { op, expr: inner, span } => {
                let inner_ir = self.lower_expr(arena, registry, pool, prim, inner)?;
                let t = self.resolve_type(registry, pool, prim, inner)?;
                let sign_str = format!("{}({})", op.mangled_name(), pool.as_str(t));
                let sign = pool.intern_str(&sign_str);
                if registry.find_func(sign).is_none() {
                    return Err(SemaError::Unresolved(*span, sign_str));
                }
                let mut args = BVec::new_in(arena);
                args.push(*inner_ir);
                RExpr::Call { sign, args: args.into_bump_slice(), span: *span }
            }
            ast::Expr::Binary { op, lhs, rhs, span } => {
                let lhs_ir = self.lower_expr(arena, registry, pool, prim, lhs)?;
                let rhs_ir = self.lower_expr(arena, registry, pool, prim, rhs)?;
                let lt = self.resolve_type(registry, pool, prim, lhs)?;
                let rt = self.resolve_type(registry, pool, prim, rhs)?;
                let sign_str =
                    format!("{}({},{})", op.mangled_name(), pool.as_str(lt), pool.as_str(rt));
                let sign = pool.intern_str(&sign_str);
                if registry.find_func(sign).is_none() {
                    return Err(SemaError::Unresolved(*span, sign_str));
                }
                let mut args = BVec::new_in(arena);
                args.push(*lhs_ir);
                args.push(*rhs_ir);
                RExpr::Call { sign, args: args.into_bump_slice(), span: *span }
            }
            ast::Expr::Cond { cond, then_expr, else_expr, span } => {
                let cond_ir = self.lower_expr(arena, registry, pool, prim, cond)?;
                let then_ir = self.lower_expr(arena, registry, pool, prim, then_expr)?;
                let else_ir = self.lower_expr(arena, registry, pool, prim, else_expr)?;
                let a = self.resolve_type(registry, pool, prim, then_expr)?;
                let b = self.resolve_type(registry, pool, prim, else_expr)?;
                if a != b {
                    return Err(SemaError::CondTypeMismatch(
                        *span,
                        pool.as_str(a).to_string(),
                        pool.as_str(b).to_string(),
                    ));
                }
                RExpr::Cond { cond: cond_ir, then_expr: then_ir, else_expr: else_ir }
            }
            ast::Expr::Invoke { callee, args, span } => {
                let mut arg_irs = BVec::new_in(arena);
                let mut arg_types = Vec::with_capacity(args.len());
                for a in args.iter() {
                    arg_irs.push(*self.lower_expr(arena, registry, pool, prim, a)?);
                    arg_types.push(self.resolve_type(registry, pool, prim, a)?);
                }
                let sign_str = invoke_signature_string(callee, &arg_types, pool);
                let sign = pool.intern_str(&sign_str);
                if registry.find_func(sign).is_some() {
                    RExpr::Call { sign, args: arg_irs.into_bump_slice(), span: *span }
                } else if let ast::Expr::Id { primary: None, name, .. } = callee {
                    if registry.find_type(*name).is_some() {
                        RExpr::Construct {
                            type_name: *name,
                            args: arg_irs.into_bump_slice(),
                            span: *span,
                        }
                    } else {
                        return Err(SemaError::Unresolved(*span, sign_str));
                    }
                } else {
                    return Err(SemaError::Unresolved(*span, sign_str));
                }
            }
            ast::Expr::Assign { op, lhs, rhs, span } => {
                return self.lower_assign(arena, registry, pool, prim, *op, lhs, rhs, *span)
            }
        };
        Ok(arena.alloc(node))
    }

    #[allow(clippy::too_many_arguments)]
    fn lower_assign<'a>(
        &mut self,
        arena: &'a Bump,
        registry: &Registry,
        pool: &mut StringPool,
        prim: &Primitives,
        op: AssignOp,
        lhs: &ast::Expr<'a>,
        rhs: &ast::Expr<'a>,
        span: lumen_util::Span,
    ) -> Result<&'a RExpr<'a>, SemaError> {
        let rhs_ir = match assign_op_to_binary(op) {
            None => self.lower_expr(arena, registry, pool, prim, rhs)?,
            Some(bin_op) => {
                let lhs_val = self.lower_expr(arena, registry, pool, prim, lhs)?;
                let rhs_val = self.lower_expr(arena, registry, pool, prim, rhs)?;
                let lt = self.resolve_type(registry, pool, prim, lhs)?;
                let rt = self.resolve_type(registry, pool, prim, rhs)?;
                let sign_str = format!(
                    "{}({},{})",
                    bin_op.mangled_name(),
                    pool.as_str(lt),
                    pool.as_str(rt)
                );
                let sign = pool.intern_str(&sign_str);
                if registry.find_func(sign).is_none() {
                    return Err(SemaError::Unresolved(span, sign_str));
                }
                let mut args = BVec::new_in(arena);
                args.push(*lhs_val);
                args.push(*rhs_val);
                arena.alloc(RExpr::Call { sign, args: args.into_bump_slice(), span })
            }
        };

        let node = match lhs {
            ast::Expr::Id { primary: Some(p), name, span: fspan } => {
                let primary_ir = self.lower_expr(arena, registry, pool, prim, p)?;
                let primary_type = self.resolve_type(registry, pool, prim, p)?;
                let td = registry.find_type(primary_type).ok_or_else(|| {
                    SemaError::Unresolved(*fspan, pool.as_str(primary_type).to_string())
                })?;
                let field = td.field_index(*name).ok_or_else(|| {
                    SemaError::UnknownField(
                        *fspan,
                        pool.as_str(primary_type).to_string(),
                        pool.as_str(*name).to_string(),
                    )
                })?;
                RExpr::StoreField { primary: primary_ir, field: FieldIdx(field as u8), rhs: rhs_ir }
            }
            ast::Expr::Id { primary: None, name, span: fspan } => {
                if let Some(idx) = self.find_local(*name) {
                    RExpr::StoreLocal { idx: LocalIdx(idx as u8), rhs: rhs_ir }
                } else if let Some(idx) = self.find_param(*name) {
                    RExpr::StoreArg { idx: ParamIdx(idx as u8), rhs: rhs_ir }
                } else {
                    return Err(SemaError::InvalidAssignTarget(*fspan));
                }
            }
            _ => return Err(SemaError::InvalidAssignTarget(span)),
        };
        Ok(arena.alloc(node))
    }

    fn lower_stmt<'a>(
        &mut self,
        arena: &'a Bump,
        registry: &Registry,
        pool: &mut StringPool,
        prim: &Primitives,
        stmt: &ast::Stmt<'a>,
    ) -> Result<&'a RStmt<'a>, SemaError> {
        let node = match stmt {
            ast::Stmt::Expr(e) => RStmt::Expr(self.lower_expr(arena, registry, pool, prim, e)?),
            ast::Stmt::Return(e, _) => RStmt::Return(match e {
                Some(e) => Some(self.lower_expr(arena, registry, pool, prim, e)?),
                None => None,
            }),
            ast::Stmt::If { cond, then_branch, else_branch, .. } => {
                let cond = self.lower_expr(arena, registry, pool, prim, cond)?;
                let then_branch = self.lower_scoped_stmt(arena, registry, pool, prim, then_branch)?;
                let else_branch = match else_branch {
                    Some(s) => Some(self.lower_scoped_stmt(arena, registry, pool, prim, s)?),
                    None => None,
                };
                RStmt::If { cond, then_branch, else_branch }
            }
            ast::Stmt::While { cond, body, .. } => RStmt::While {
                cond: self.lower_expr(arena, registry, pool, prim, cond)?,
                body: self.lower_scoped_stmt(arena, registry, pool, prim, body)?,
            },
            ast::Stmt::Do { body, cond, .. } => {
                let body = self.lower_scoped_stmt(arena, registry, pool, prim, body)?;
                let cond = self.lower_expr(arena, registry, pool, prim, cond)?;
                RStmt::Do { body, cond }
            }
            ast::Stmt::Decl { type_ref, name, init, span } => {
                if self.find_local(*name).is_some() {
                    return Err(SemaError::DuplicateLocal(*span, pool.as_str(*name).to_string()));
                }
                let type_name = match type_ref {
                    Some(tr) => tr.name,
                    None => match init {
                        Some(e) => self.resolve_type(registry, pool, prim, e)?,
                        None => return Err(SemaError::UnknownIdent(*span)),
                    },
                };
                let local_idx = self.locals.len();
                if local_idx >= 256 {
                    return Err(SemaError::TooManyLocals);
                }
                self.locals.push((*name, type_name));
                let init_ir = match init {
                    Some(e) => Some(self.lower_expr(arena, registry, pool, prim, e)?),
                    None => None,
                };
                RStmt::Decl { idx: LocalIdx(local_idx as u8), init: init_ir }
            }
            ast::Stmt::Block(stmts, _) => {
                let mark = self.locals.len();
                let mut v = BVec::new_in(arena);
                for s in stmts.iter() {
                    v.push(*self.lower_stmt(arena, registry, pool, prim, s)?);
                }
                self.locals.truncate(mark);
                RStmt::Block(v.into_bump_slice())
            }
        };
        Ok(arena.alloc(node))
    }

    /// Lowers a control-structure body, releasing any local it declares once
    /// the body's own scope ends. A `Block` body already pops its locals in
    /// the `Stmt::Block` arm above; this also covers the brace-less
    /// single-statement form, where the body can itself be a bare `Decl`
    /// whose local must not outlive the loop/branch it's scoped to.
    fn lower_scoped_stmt<'a>(
        &mut self,
        arena: &'a Bump,
        registry: &Registry,
        pool: &mut StringPool,
        prim: &Primitives,
        stmt: &ast::Stmt<'a>,
    ) -> Result<&'a RStmt<'a>, SemaError> {
        let mark = self.locals.len();
        let node = self.lower_stmt(arena, registry, pool, prim, stmt)?;
        self.locals.truncate(mark);
        Ok(node)
    }
}

fn invoke_signature_string(callee: &ast::Expr<'_>, arg_types: &[Symbol], pool: &StringPool) -> String {
    let mut s = String::new();
    if let ast::Expr::Id { primary, name, .. } = callee {
        if let Some(ast::Expr::Id { primary: None, name: prim_name, .. }) = primary {
            s.push_str(pool.as_str(*prim_name));
            s.push('.');
        }
        s.push_str(pool.as_str(*name));
    }
    s.push('(');
    for (i, t) in arg_types.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        s.push_str(pool.as_str(*t));
    }
    s.push(')');
    s
}

fn lower_type(decl: &ast::TypeDecl<'_>) -> TypeDef {
    TypeDef {
        name: decl.name,
        fields: decl.fields.iter().map(|f| (f.name, f.type_ref.name)).collect(),
    }
}

fn lower_enum(decl: &ast::EnumDecl<'_>) -> EnumDef {
    let mut next = 0i64;
    let values = decl
        .values
        .iter()
        .map(|v| {
            let discriminant = match v.expr {
                Some(ast::Expr::Int(n, _)) => *n,
                _ => next,
            };
            next = discriminant + 1;
            (v.name, discriminant)
        })
        .collect();
    EnumDef { name: decl.name, values }
}

fn func_signature_string(pool: &StringPool, func: &ast::FuncDecl<'_>) -> String {
    let mut s = String::new();
    s.push_str(pool.as_str(func.name));
    s.push('(');
    for (i, p) in func.params.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        s.push_str(pool.as_str(p.type_ref.name));
    }
    s.push(')');
    s
}

/// Resolves and lowers one parsed module. The module's own declarations
/// are registered into `registry` (front of the search order, so
/// sibling functions can call each other) before any body is lowered,
/// and stay registered afterward so later modules can call into this
/// one — mirroring how a later `fin_mod_compile` call's
/// `fin_mod_find_func` walks a chain of already-registered modules.
pub fn compile_module<'a>(
    arena: &'a Bump,
    registry: &mut Registry,
    pool: &mut StringPool,
    module: &ast::Module<'a>,
    name: Option<Symbol>,
) -> Result<RModule<'a>, SemaError> {
    let prim = Primitives::new(pool);

    let types: Vec<TypeDef> = module.types.iter().map(lower_type).collect();
    let enums: Vec<EnumDef> = module.enums.iter().map(lower_enum).collect();
    let mut funcs_sig = Vec::with_capacity(module.funcs.len());
    for f in module.funcs.iter() {
        let sign_str = func_signature_string(pool, f);
        funcs_sig.push(FuncSig {
            sign: pool.intern_str(&sign_str),
            ret_type: f.ret.map(|r| r.name),
            arg_count: f.params.len() as u8,
        });
    }

    let own_table = ModuleTable { name, types, enums, funcs: funcs_sig };
    registry.register(own_table);

    let mut funcs = Vec::with_capacity(module.funcs.len());
    for f in module.funcs.iter() {
        let mut fc = FuncCompiler::new();
        if f.params.len() > 32 {
            return Err(SemaError::TooManyParams);
        }
        for p in f.params.iter() {
            fc.params.push((p.name, p.type_ref.name));
        }
        let mut body = BVec::new_in(arena);
        for s in f.body.iter() {
            body.push(*fc.lower_stmt(arena, registry, pool, &prim, s)?);
        }
        let sign_str = func_signature_string(pool, f);
        funcs.push(RFunc {
            sign: pool.intern_str(&sign_str),
            ret_type: f.ret.map(|r| r.name),
            arg_count: fc.params.len() as u8,
            local_count: fc.locals.len() as u8,
            body: body.into_bump_slice(),
        });
    }

    Ok(RModule { funcs })
}
