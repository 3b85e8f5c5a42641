use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid matrix file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Window length {found} does not match motif length {expected}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { position: usize, symbol: char },

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Data error: {0}")]
    DataError(String),
}

/// Type alias for Result with MotifError
pub type Result<T> = std::result::Result<T, MotifError>;

impl MotifError {
    /// Create a new Parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        MotifError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a new InvalidSymbol error for the character of `sequence`
    /// covering byte `position`
    pub fn invalid_symbol(sequence: &str, position: usize) -> Self {
        let start = (0..=position)
            .rev()
            .find(|&i| sequence.is_char_boundary(i))
            .unwrap_or(0);
        MotifError::InvalidSymbol {
            position: start,
            symbol: sequence[start..]
                .chars()
                .next()
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        }
    }
}
