use thiserror::Error;

#[derive(Debug, Error)]
pub enum NativeError {
    #[error("native signature `{0}` failed to tokenize")]
    Lex(String, #[source] lumen_lex::LexError),
    #[error("native signature `{0}` is malformed")]
    Malformed(String),
}
