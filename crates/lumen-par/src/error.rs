use lumen_lex::LexError;
use lumen_util::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("{0}: expected {1}, found something else")]
    Expected(Span, &'static str),
    #[error("{0}: '{1}' is a reserved word that isn't implemented yet")]
    Reserved(Span, &'static str),
    #[error("{0}: unexpected end of input")]
    UnexpectedEof(Span),
}
