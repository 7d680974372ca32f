use lumen_util::Span;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SemaError {
    #[error("{0}: unknown identifier")]
    UnknownIdent(Span),
    #[error("{0}: no function or type matches `{1}`")]
    Unresolved(Span, String),
    #[error("{0}: conditional branches have different types (`{1}` vs `{2}`)")]
    CondTypeMismatch(Span, String, String),
    #[error("{0}: `{1}` has no field named `{2}`")]
    UnknownField(Span, String, String),
    #[error("{0}: local `{1}` is already declared in this scope")]
    DuplicateLocal(Span, String),
    #[error("{0}: assignment target must be a local, parameter, or field")]
    InvalidAssignTarget(Span),
    #[error("too many locals in a single function (max 256)")]
    TooManyLocals,
    #[error("too many parameters in a single function (max 32)")]
    TooManyParams,
}
