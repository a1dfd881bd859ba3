use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocketError {
    #[error("Unknown index: {0}")]
    UnknownIndex(String),
    #[error("Syntax error: {message}")]
    Syntax {
        message: String,
        line: Option<usize>,
        col: Option<usize>,
    },
    #[error("Unsupported expression element: {0}")]
    UnsupportedSyntax(String),
    #[error("Undefined name: {0}")]
    UndefinedName(String),
    #[error("Bad expression: {0}")]
    BadExpression(String),
}

pub type Result<T> = std::result::Result<T, DocketError>;
