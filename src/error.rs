//! Error types for odaq query compilation.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for odaq query compilation.
#[derive(Debug, Error)]
pub enum Error {
    // ==================== Lexical Errors ====================
    /// Unrecognized character in the clause text.
    #[error("syntax error at position {position}: unexpected character '{ch}'")]
    UnexpectedChar { position: usize, ch: char },

    /// A literal started correctly but its payload is invalid
    /// (unterminated string, bad datetime/guid/hex, numeric overflow).
    #[error("syntax error at position {position}: {message}")]
    MalformedLiteral { position: usize, message: String },

    // ==================== Parse Errors ====================
    /// Grammar violation: unexpected token, unknown function, wrong arity,
    /// unmatched parenthesis, trailing input.
    #[error("parse error at position {position}: expected {expected}, found {found}")]
    Parse {
        position: usize,
        expected: String,
        found: String,
    },

    // ==================== Binding Errors ====================
    /// Type resolution failure (client bad-request class).
    #[error("type error: {0}")]
    Type(String),

    // ==================== Schema Errors ====================
    /// Schema registry misuse (duplicate type, unknown root type).
    #[error("schema error: {0}")]
    Schema(String),
}

impl Error {
    /// Builds a parse error from the expected description and the found token text.
    #[must_use]
    pub fn parse(position: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::Parse {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
