use crate::error::LexError;
use crate::token::{keyword, Literal, Token, TokenKind};
use lumen_intern::StringPool;
use lumen_util::Span;

const MAX_STATE_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Global,
    Str,
    Interp,
}

/// Tokenizer over a single source buffer.
///
/// Mirrors a hand-rolled scanner with an explicit tiny stack of lexer
/// states rather than a combinator: the grammar needs that stack to
/// track whether a `}` closes a brace block or resumes a string after
/// `${...}` interpolation, and whether a bare `{` inside a string
/// literal starts an interpolation or is just a character.
pub struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    states: Vec<State>,
}

fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_name_cont(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit()
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            states: vec![State::Global],
        }
    }

    fn span(&self) -> Span {
        Span::new(self.line)
    }

    fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn advance(&mut self) -> u8 {
        let b = self.peek();
        self.pos += 1;
        b
    }

    fn match_byte(&mut self, b: u8) -> bool {
        if self.peek() == b {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn push_state(&mut self, state: State) -> Result<(), LexError> {
        if self.states.len() >= MAX_STATE_DEPTH {
            return Err(LexError::StateStackOverflow(self.span()));
        }
        self.states.push(state);
        Ok(())
    }

    fn pop_state(&mut self) -> Result<State, LexError> {
        if self.states.len() <= 1 {
            return Err(LexError::StateStackUnderflow(self.span()));
        }
        Ok(self.states.pop().unwrap())
    }

    fn top_state(&self) -> State {
        *self.states.last().expect("state stack never empty")
    }

    fn skip_line_comment(&mut self) {
        while self.peek() != b'\n' && self.peek() != 0 {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        while self.peek() != 0 {
            if self.peek() == b'*' && self.peek_at(1) == b'/' {
                self.pos += 2;
                return;
            }
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn scan_number(&mut self, start: usize) -> Result<Token, LexError> {
        let span = self.span();
        let mut is_float = false;
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        if self.match_byte(b'.') {
            is_float = true;
        }
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
        if is_float {
            let value: f64 = text.parse().map_err(|_| LexError::InvalidNumber(span))?;
            Ok(Token::new(TokenKind::Float, Literal::Float(value), span))
        } else {
            let value: i64 = text.parse().map_err(|_| LexError::InvalidNumber(span))?;
            Ok(Token::new(TokenKind::Int, Literal::Int(value), span))
        }
    }

    fn scan_name(&mut self, start: usize, pool: &mut StringPool) -> Token {
        let span = self.span();
        while is_name_cont(self.peek()) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
        if let Some(kind) = keyword(text) {
            return Token::simple(kind, span);
        }
        let sym = pool.intern_str(text);
        Token::new(TokenKind::Name, Literal::Name(sym), span)
    }

    /// Scan string-literal content up to the next unescaped `"` or the
    /// start of a `${` interpolation block.
    fn scan_string_chunk(&mut self, pool: &mut StringPool) -> Result<Token, LexError> {
        let span = self.span();
        let start = self.pos;
        loop {
            let c = self.advance();
            match c {
                0 => return Err(LexError::UnterminatedString(span)),
                b'{' => {
                    if self.pos - start > 1 {
                        self.pos -= 1;
                        let text = &self.bytes[start..self.pos];
                        let sym = pool.intern(text);
                        return Ok(Token::new(TokenKind::String, Literal::Str(sym), span));
                    }
                    self.push_state(State::Interp)?;
                    return Ok(Token::simple(TokenKind::LStrInterp, span));
                }
                b'"' => {
                    if self.pos - start > 1 {
                        self.pos -= 1;
                        let text = &self.bytes[start..self.pos];
                        let sym = pool.intern(text);
                        return Ok(Token::new(TokenKind::String, Literal::Str(sym), span));
                    }
                    self.pop_state()?;
                    return Ok(Token::simple(TokenKind::Quote, span));
                }
                b'\n' => self.line += 1,
                _ => {}
            }
        }
    }

    /// Produce the next token. Requires the pool to intern names and
    /// string-literal fragments as they're scanned.
    pub fn next_token(&mut self, pool: &mut StringPool) -> Result<Token, LexError> {
        if self.top_state() == State::Str {
            return self.scan_string_chunk(pool);
        }

        if self.peek() == 0 {
            return Ok(Token::simple(TokenKind::Eof, self.span()));
        }

        loop {
            let start = self.pos;
            let c = self.advance();
            let span = self.span();
            let kind = match c {
                0 => TokenKind::Eof,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'[' => TokenKind::LBracket,
                b']' => TokenKind::RBracket,
                b'{' => TokenKind::LBrace,
                b'.' => TokenKind::Dot,
                b',' => TokenKind::Comma,
                b'?' => TokenKind::Question,
                b':' => TokenKind::Colon,
                b';' => TokenKind::Semicolon,
                b'~' => TokenKind::Tilde,
                b'=' => {
                    if self.match_byte(b'=') {
                        TokenKind::EqEq
                    } else {
                        TokenKind::Eq
                    }
                }
                b'!' => {
                    if self.match_byte(b'=') {
                        TokenKind::BangEq
                    } else {
                        TokenKind::Bang
                    }
                }
                b'*' => {
                    if self.match_byte(b'=') {
                        TokenKind::StarEq
                    } else {
                        TokenKind::Star
                    }
                }
                b'%' => {
                    if self.match_byte(b'=') {
                        TokenKind::PercentEq
                    } else {
                        TokenKind::Percent
                    }
                }
                b'^' => {
                    if self.match_byte(b'=') {
                        TokenKind::CaretEq
                    } else {
                        TokenKind::Caret
                    }
                }
                b'+' => {
                    if self.match_byte(b'+') {
                        TokenKind::PlusPlus
                    } else if self.match_byte(b'=') {
                        TokenKind::PlusEq
                    } else {
                        TokenKind::Plus
                    }
                }
                b'-' => {
                    if self.match_byte(b'-') {
                        TokenKind::MinusMinus
                    } else if self.match_byte(b'=') {
                        TokenKind::MinusEq
                    } else {
                        TokenKind::Minus
                    }
                }
                b'|' => {
                    if self.match_byte(b'|') {
                        TokenKind::PipePipe
                    } else if self.match_byte(b'=') {
                        TokenKind::PipeEq
                    } else {
                        TokenKind::Pipe
                    }
                }
                b'&' => {
                    if self.match_byte(b'&') {
                        TokenKind::AmpAmp
                    } else if self.match_byte(b'=') {
                        TokenKind::AmpEq
                    } else {
                        TokenKind::Amp
                    }
                }
                b'<' => {
                    if self.match_byte(b'<') {
                        if self.match_byte(b'=') {
                            TokenKind::LtLtEq
                        } else {
                            TokenKind::LtLt
                        }
                    } else if self.match_byte(b'=') {
                        TokenKind::LtEq
                    } else {
                        TokenKind::Lt
                    }
                }
                b'>' => {
                    if self.match_byte(b'>') {
                        if self.match_byte(b'=') {
                            TokenKind::GtGtEq
                        } else {
                            TokenKind::GtGt
                        }
                    } else if self.match_byte(b'=') {
                        TokenKind::GtEq
                    } else {
                        TokenKind::Gt
                    }
                }
                b'/' => {
                    if self.match_byte(b'/') {
                        self.skip_line_comment();
                        continue;
                    } else if self.match_byte(b'*') {
                        self.skip_block_comment();
                        continue;
                    } else if self.match_byte(b'=') {
                        TokenKind::SlashEq
                    } else {
                        TokenKind::Slash
                    }
                }
                b' ' | b'\t' | b'\r' => continue,
                b'\n' => {
                    self.line += 1;
                    continue;
                }
                b'"' => {
                    self.push_state(State::Str)?;
                    TokenKind::Quote
                }
                b'}' => {
                    if self.top_state() == State::Interp {
                        self.pop_state()?;
                        TokenKind::RStrInterp
                    } else {
                        TokenKind::RBrace
                    }
                }
                _ => {
                    if is_name_start(c) {
                        return Ok(self.scan_name(start, pool));
                    }
                    if c.is_ascii_digit() {
                        return self.scan_number(start);
                    }
                    return Err(LexError::UnexpectedChar(span, c as char));
                }
            };
            return Ok(Token::simple(kind, span));
        }
    }

    /// Tokenize the whole source eagerly, the form `lumen-par` consumes.
    pub fn tokenize(mut self, pool: &mut StringPool) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token(pool)?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}
