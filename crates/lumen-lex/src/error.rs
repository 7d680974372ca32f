use lumen_util::Span;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LexError {
    #[error("{0}: unexpected character {1:?}")]
    UnexpectedChar(Span, char),
    #[error("{0}: unterminated string literal")]
    UnterminatedString(Span),
    #[error("{0}: invalid numeric literal")]
    InvalidNumber(Span),
    #[error("{0}: string interpolation nested too deeply")]
    StateStackOverflow(Span),
    #[error("{0}: unbalanced string interpolation terminator")]
    StateStackUnderflow(Span),
}
