//! Error types for tm-sql

use thiserror::Error;

/// SQL splitting and classification errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// Tokenizer rejected the input (S001)
    #[error("[S001] Failed to tokenize {file} at line {line}, column {column}: {message}")]
    Tokenize {
        file: String,
        message: String,
        line: usize,
        column: usize,
    },

    /// Statements of different kinds in one migration file (S002)
    #[error("[S002] Cannot mix statement kinds in one migration file {file}: found {kinds}")]
    MixedStatementKinds { file: String, kinds: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
