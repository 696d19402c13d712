use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("buffer holds {actual} bytes but the header declares {needed}")]
    MalformedHeader { needed: usize, actual: usize },

    #[error("header field '{0}' is not a valid number")]
    InvalidNumericField(&'static str),

    #[error("invalid number of signals: {0}")]
    InvalidSignalCount(i64),
}

pub type Result<T> = std::result::Result<T, EdfError>;
