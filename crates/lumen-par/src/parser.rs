use crate::ast::*;
use crate::error::ParseError;
use bumpalo::collections::Vec as BVec;
use bumpalo::Bump;
use lumen_intern::{StringPool, Symbol};
use lumen_lex::{Lexer, Literal, Token, TokenKind};
use lumen_util::Span;

pub struct Parser<'a> {
    arena: &'a Bump,
    tokens: Vec<Token>,
    pos: usize,
    sym_true: Symbol,
    sym_false: Symbol,
}

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, source: &str, pool: &mut StringPool) -> PResult<Self> {
        let tokens = Lexer::new(source).tokenize(pool)?;
        let sym_true = pool.intern_str("true");
        let sym_false = pool.intern_str("false");
        Ok(Parser { arena, tokens, pos: 0, sym_true, sym_false })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn match_tok(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &'static str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::Expected(self.span(), what))
        }
    }

    fn checkpoint(&self) -> usize {
        self.pos
    }

    fn restore(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    fn consume_name(&mut self) -> PResult<Symbol> {
        let tok = self.expect(TokenKind::Name, "identifier")?;
        match tok.literal {
            Literal::Name(sym) => Ok(sym),
            _ => unreachable!("Name token always carries Literal::Name"),
        }
    }

    fn parse_type_ref(&mut self) -> PResult<TypeRef> {
        let first = self.consume_name()?;
        if self.match_tok(TokenKind::Dot) {
            let name = self.consume_name()?;
            Ok(TypeRef { module: Some(first), name })
        } else {
            Ok(TypeRef { module: None, name: first })
        }
    }

    // ----- expressions, lowest-to-highest precedence entry point -----

    pub fn parse_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let expr = self.parse_cond_or_expr()?;
        match self.peek_kind() {
            TokenKind::Question => self.parse_cond_expr(expr),
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::AmpEq
            | TokenKind::PipeEq
            | TokenKind::CaretEq
            | TokenKind::LtLtEq
            | TokenKind::GtGtEq => self.parse_assign_expr(expr),
            _ => Ok(expr),
        }
    }

    fn parse_cond_expr(&mut self, cond: &'a Expr<'a>) -> PResult<&'a Expr<'a>> {
        let span = self.span();
        self.expect(TokenKind::Question, "'?'")?;
        let then_expr = self.parse_cond_or_expr()?;
        self.expect(TokenKind::Colon, "':'")?;
        let else_expr = self.parse_cond_or_expr()?;
        Ok(self.arena.alloc(Expr::Cond { cond, then_expr, else_expr, span }))
    }

    fn parse_assign_expr(&mut self, lhs: &'a Expr<'a>) -> PResult<&'a Expr<'a>> {
        let span = self.span();
        let op = match self.advance().kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::AmpEq => AssignOp::And,
            TokenKind::PipeEq => AssignOp::Or,
            TokenKind::CaretEq => AssignOp::Xor,
            TokenKind::LtLtEq => AssignOp::Shl,
            TokenKind::GtGtEq => AssignOp::Shr,
            _ => unreachable!("caller only dispatches here on an assignment token"),
        };
        let rhs = self.parse_expr()?;
        Ok(self.arena.alloc(Expr::Assign { op, lhs, rhs, span }))
    }

    fn parse_cond_or_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_cond_and_expr()?;
        while self.check(TokenKind::PipePipe) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_cond_and_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op: BinaryOp::Or, lhs, rhs, span });
        }
        Ok(lhs)
    }

    fn parse_cond_and_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_or_expr()?;
        while self.check(TokenKind::AmpAmp) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_or_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op: BinaryOp::And, lhs, rhs, span });
        }
        Ok(lhs)
    }

    fn parse_or_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_xor_expr()?;
        while self.check(TokenKind::Pipe) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_xor_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op: BinaryOp::BOr, lhs, rhs, span });
        }
        Ok(lhs)
    }

    fn parse_xor_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_and_expr()?;
        while self.check(TokenKind::Caret) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_and_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op: BinaryOp::BXor, lhs, rhs, span });
        }
        Ok(lhs)
    }

    /// `&` always mangles to the bitwise-and operator signature, never
    /// silently aliased to equality.
    fn parse_and_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_equality_expr()?;
        while self.check(TokenKind::Amp) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_equality_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op: BinaryOp::BAnd, lhs, rhs, span });
        }
        Ok(lhs)
    }

    fn parse_equality_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_relational_expr()?;
        loop {
            let span = self.span();
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Neq,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_relational_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op, lhs, rhs, span });
        }
    }

    fn parse_relational_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_shift_expr()?;
        loop {
            let span = self.span();
            let op = match self.peek_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::Leq,
                TokenKind::GtEq => BinaryOp::Geq,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_shift_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op, lhs, rhs, span });
        }
    }

    fn parse_shift_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_additive_expr()?;
        loop {
            let span = self.span();
            let op = match self.peek_kind() {
                TokenKind::LtLt => BinaryOp::Shl,
                TokenKind::GtGt => BinaryOp::Shr,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_additive_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op, lhs, rhs, span });
        }
    }

    fn parse_additive_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_multiplicative_expr()?;
        loop {
            let span = self.span();
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiplicative_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op, lhs, rhs, span });
        }
    }

    fn parse_multiplicative_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let span = self.span();
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_unary_expr()?;
            lhs = self.arena.alloc(Expr::Binary { op, lhs, rhs, span });
        }
    }

    fn parse_unary_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let span = self.span();
        let op = match self.peek_kind() {
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BNot),
            TokenKind::PlusPlus => Some(UnaryOp::Inc),
            TokenKind::MinusMinus => Some(UnaryOp::Dec),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let expr = self.parse_unary_expr()?;
            return Ok(self.arena.alloc(Expr::Unary { op, expr, span }));
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let span = self.span();
        match self.peek_kind() {
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Int => {
                let tok = self.advance();
                match tok.literal {
                    Literal::Int(v) => Ok(self.arena.alloc(Expr::Int(v, span))),
                    _ => unreachable!(),
                }
            }
            TokenKind::Float => {
                let tok = self.advance();
                match tok.literal {
                    Literal::Float(v) => Ok(self.arena.alloc(Expr::Float(v, span))),
                    _ => unreachable!(),
                }
            }
            TokenKind::Quote => self.parse_string_expr(),
            TokenKind::Name => {
                let name = self.consume_name()?;
                if name == self.sym_true {
                    return Ok(self.arena.alloc(Expr::Bool(true, span)));
                }
                if name == self.sym_false {
                    return Ok(self.arena.alloc(Expr::Bool(false, span)));
                }
                let mut expr: &'a Expr<'a> = self.arena.alloc(Expr::Id { primary: None, name, span });
                loop {
                    if self.match_tok(TokenKind::Dot) {
                        let field_span = self.span();
                        let next = self.consume_name()?;
                        expr = self.arena.alloc(Expr::Id {
                            primary: Some(expr),
                            name: next,
                            span: field_span,
                        });
                    } else {
                        break;
                    }
                }
                if self.check(TokenKind::LParen) {
                    expr = self.parse_invoke_expr(expr)?;
                } else if self.check(TokenKind::LBrace) {
                    expr = self.parse_brace_construct_expr(expr)?;
                }
                Ok(expr)
            }
            _ => Err(ParseError::Expected(span, "an expression")),
        }
    }

    fn parse_string_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let span = self.span();
        self.expect(TokenKind::Quote, "'\"'")?;
        let mut parts: BVec<'a, Expr<'a>> = BVec::new_in(self.arena);
        loop {
            match self.peek_kind() {
                TokenKind::String => {
                    let tok = self.advance();
                    let sym = match tok.literal {
                        Literal::Str(s) => s,
                        _ => unreachable!(),
                    };
                    parts.push(Expr::Str(sym, tok.span));
                }
                TokenKind::LStrInterp => {
                    self.advance();
                    let inner = self.parse_expr()?;
                    self.expect(TokenKind::RStrInterp, "'}'")?;
                    parts.push(*inner);
                }
                TokenKind::Quote => {
                    self.advance();
                    break;
                }
                _ => return Err(ParseError::Expected(self.span(), "string content")),
            }
        }
        if parts.len() == 1 {
            if let Expr::Str(_, _) = parts[0] {
                return Ok(self.arena.alloc(parts[0]));
            }
        }
        Ok(self.arena.alloc(Expr::StrInterp(parts.into_bump_slice(), span)))
    }

    fn parse_invoke_expr(&mut self, callee: &'a Expr<'a>) -> PResult<&'a Expr<'a>> {
        let span = self.span();
        self.expect(TokenKind::LParen, "'('")?;
        let mut args: BVec<'a, Expr<'a>> = BVec::new_in(self.arena);
        while !self.check(TokenKind::RParen) {
            if !args.is_empty() {
                self.expect(TokenKind::Comma, "','")?;
            }
            args.push(*self.parse_expr()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(self.arena.alloc(Expr::Invoke { callee, args: args.into_bump_slice(), span }))
    }

    /// `Type { a, b, c }` — a brace-enclosed positional field list.
    /// Lowers to the same `Expr::Invoke` a call-syntax construction
    /// does; which one a callee names (function vs. struct type) isn't
    /// decided until semantic resolution either way.
    fn parse_brace_construct_expr(&mut self, callee: &'a Expr<'a>) -> PResult<&'a Expr<'a>> {
        let span = self.span();
        let args = self.parse_brace_arg_list()?;
        Ok(self.arena.alloc(Expr::Invoke { callee, args, span }))
    }

    fn parse_brace_arg_list(&mut self) -> PResult<&'a [Expr<'a>]> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut args: BVec<'a, Expr<'a>> = BVec::new_in(self.arena);
        while !self.check(TokenKind::RBrace) {
            if !args.is_empty() {
                self.expect(TokenKind::Comma, "','")?;
            }
            args.push(*self.parse_expr()?);
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(args.into_bump_slice())
    }

    // ----- statements -----

    pub fn parse_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let span = self.span();
        match self.peek_kind() {
            TokenKind::LBrace => self.parse_block_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_stmt(),
            TokenKind::For => Err(ParseError::Reserved(span, "for")),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Name => self.parse_name_led_stmt(),
            _ => Err(ParseError::Expected(span, "a statement")),
        }
    }

    fn parse_block_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let span = self.span();
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut stmts: BVec<'a, Stmt<'a>> = BVec::new_in(self.arena);
        while !self.match_tok(TokenKind::RBrace) {
            stmts.push(*self.parse_stmt()?);
        }
        Ok(self.arena.alloc(Stmt::Block(stmts.into_bump_slice(), span)))
    }

    fn parse_if_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let span = self.span();
        self.expect(TokenKind::If, "'if'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        let then_branch = self.parse_stmt()?;
        let else_branch = if self.match_tok(TokenKind::Else) {
            Some(&*self.parse_stmt()?)
        } else {
            None
        };
        Ok(self.arena.alloc(Stmt::If { cond, then_branch, else_branch, span }))
    }

    fn parse_while_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let span = self.span();
        self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_stmt()?;
        Ok(self.arena.alloc(Stmt::While { cond, body, span }))
    }

    fn parse_do_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let span = self.span();
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_stmt()?;
        self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(self.arena.alloc(Stmt::Do { body, cond, span }))
    }

    fn parse_return_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let span = self.span();
        self.expect(TokenKind::Return, "'return'")?;
        if self.match_tok(TokenKind::Semicolon) {
            return Ok(self.arena.alloc(Stmt::Return(None, span)));
        }
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(self.arena.alloc(Stmt::Return(Some(expr), span)))
    }

    /// A statement starting with a name is ambiguous between a local
    /// declaration (`Type name = expr;`) and an expression statement
    /// (`name(...)`, `name = expr;`, `name.field;`). Try the type-ref
    /// parse; if a second name follows, it was a declaration, else
    /// rewind and parse as an expression.
    fn parse_name_led_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let span = self.span();
        let checkpoint = self.checkpoint();
        let type_ref = self.parse_type_ref();
        if type_ref.is_ok() && self.check(TokenKind::Name) {
            let type_ref = type_ref.unwrap();
            let name = self.consume_name()?;
            let init = if self.match_tok(TokenKind::Eq) {
                if self.check(TokenKind::LBrace) {
                    // `Type name = { a, b, c };` — the brace list
                    // constructs `Type` without repeating its name.
                    let init_span = self.span();
                    let callee = self.arena.alloc(Expr::Id { primary: None, name: type_ref.name, span: init_span });
                    let args = self.parse_brace_arg_list()?;
                    Some(self.arena.alloc(Expr::Invoke { callee, args, span: init_span }))
                } else {
                    Some(self.parse_expr()?)
                }
            } else {
                None
            };
            self.expect(TokenKind::Semicolon, "';'")?;
            return Ok(self.arena.alloc(Stmt::Decl {
                type_ref: Some(type_ref),
                name,
                init,
                span,
            }));
        }
        self.restore(checkpoint);
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(self.arena.alloc(Stmt::Expr(expr)))
    }

    // ----- top level -----

    fn parse_field(&mut self) -> PResult<Field> {
        let type_ref = self.parse_type_ref()?;
        let name = self.consume_name()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Field { name, type_ref })
    }

    fn parse_struct_decl(&mut self) -> PResult<TypeDecl<'a>> {
        self.expect(TokenKind::Struct, "'struct'")?;
        let name = self.consume_name()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut fields: BVec<'a, Field> = BVec::new_in(self.arena);
        while !self.match_tok(TokenKind::RBrace) {
            fields.push(self.parse_field()?);
        }
        Ok(TypeDecl { name, fields: fields.into_bump_slice() })
    }

    fn parse_enum_decl(&mut self) -> PResult<EnumDecl<'a>> {
        self.expect(TokenKind::Enum, "'enum'")?;
        let name = self.consume_name()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut values: BVec<'a, EnumValue<'a>> = BVec::new_in(self.arena);
        while !self.match_tok(TokenKind::RBrace) {
            if !values.is_empty() {
                self.expect(TokenKind::Comma, "','")?;
                if self.check(TokenKind::RBrace) {
                    self.advance();
                    break;
                }
            }
            let value_name = self.consume_name()?;
            let expr = if self.match_tok(TokenKind::Eq) {
                Some(&*self.parse_expr()?)
            } else {
                None
            };
            values.push(EnumValue { name: value_name, expr });
        }
        Ok(EnumDecl { name, values: values.into_bump_slice() })
    }

    fn parse_param(&mut self) -> PResult<Param> {
        let type_ref = self.parse_type_ref()?;
        let name = self.consume_name()?;
        Ok(Param { name, type_ref })
    }

    fn parse_func_decl(&mut self, ret: Option<TypeRef>, name: Symbol) -> PResult<FuncDecl<'a>> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut params: BVec<'a, Param> = BVec::new_in(self.arena);
        while !self.check(TokenKind::RParen) {
            if !params.is_empty() {
                self.expect(TokenKind::Comma, "','")?;
            }
            params.push(self.parse_param()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut stmts: BVec<'a, Stmt<'a>> = BVec::new_in(self.arena);
        while !self.match_tok(TokenKind::RBrace) {
            stmts.push(*self.parse_stmt()?);
        }
        Ok(FuncDecl { name, ret, params: params.into_bump_slice(), body: stmts.into_bump_slice() })
    }

    pub fn parse_module(&mut self) -> PResult<Module<'a>> {
        let mut imports: BVec<'a, Symbol> = BVec::new_in(self.arena);
        while self.match_tok(TokenKind::Import) {
            imports.push(self.consume_name()?);
            self.expect(TokenKind::Semicolon, "';'")?;
        }

        let mut types: BVec<'a, TypeDecl<'a>> = BVec::new_in(self.arena);
        let mut enums: BVec<'a, EnumDecl<'a>> = BVec::new_in(self.arena);
        let mut funcs: BVec<'a, FuncDecl<'a>> = BVec::new_in(self.arena);

        while !self.check(TokenKind::Eof) {
            match self.peek_kind() {
                TokenKind::Struct => types.push(self.parse_struct_decl()?),
                TokenKind::Enum => enums.push(self.parse_enum_decl()?),
                TokenKind::Void => {
                    self.advance();
                    let name = self.consume_name()?;
                    funcs.push(self.parse_func_decl(None, name)?);
                }
                _ => {
                    let type_ref = self.parse_type_ref()?;
                    let name = self.consume_name()?;
                    funcs.push(self.parse_func_decl(Some(type_ref), name)?);
                }
            }
        }

        Ok(Module {
            types: types.into_bump_slice(),
            enums: enums.into_bump_slice(),
            funcs: funcs.into_bump_slice(),
            imports: imports.into_bump_slice(),
        })
    }
}
