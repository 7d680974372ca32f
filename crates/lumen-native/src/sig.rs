//! Parses native function signatures of the form `"int add(int,int)"` or
//! `"void log(string)"` into a return type, a name, and argument type
//! names — the same small-grammar parse a module does for every native
//! function it registers, run once up front rather than against the
//! full expression grammar.

use crate::error::NativeError;
use lumen_intern::{StringPool, Symbol};
use lumen_lex::{Lexer, Literal, TokenKind};

pub struct ParsedSignature {
    pub name: Symbol,
    pub ret_type: Option<Symbol>,
    pub args: Vec<Symbol>,
}

pub fn parse_signature(pool: &mut StringPool, sign: &str) -> Result<ParsedSignature, NativeError> {
    let tokens = Lexer::new(sign)
        .tokenize(pool)
        .map_err(|e| NativeError::Lex(sign.to_string(), e))?;
    let mut i = 0usize;
    let malformed = || NativeError::Malformed(sign.to_string());

    let next_name = |tokens: &[lumen_lex::Token], i: &mut usize| -> Result<Symbol, NativeError> {
        match tokens.get(*i).map(|t| t.literal) {
            Some(Literal::Name(sym)) => {
                *i += 1;
                Ok(sym)
            }
            _ => Err(malformed()),
        }
    };

    let ret_type = if tokens.get(i).map(|t| t.kind) == Some(TokenKind::Void) {
        i += 1;
        None
    } else {
        Some(next_name(&tokens, &mut i)?)
    };

    let name = next_name(&tokens, &mut i)?;

    if tokens.get(i).map(|t| t.kind) != Some(TokenKind::LParen) {
        return Err(malformed());
    }
    i += 1;

    let mut args = Vec::new();
    if tokens.get(i).map(|t| t.kind) != Some(TokenKind::RParen) {
        loop {
            args.push(next_name(&tokens, &mut i)?);
            match tokens.get(i).map(|t| t.kind) {
                Some(TokenKind::Comma) => {
                    i += 1;
                }
                _ => break,
            }
        }
    }
    if tokens.get(i).map(|t| t.kind) != Some(TokenKind::RParen) {
        return Err(malformed());
    }

    Ok(ParsedSignature { name, ret_type, args })
}
