//! Error types for map file operations.

use radiant_brush::BrushError;
use thiserror::Error;

/// Errors that can occur while reading or writing a map.
#[derive(Error, Debug)]
pub enum MapError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Lexer error: malformed token.
    #[error("Lexer error at line {line}, column {col}: {message}")]
    Lexer {
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        col: usize,
        /// Error message.
        message: String,
    },

    /// Parser error: unexpected token or malformed structure.
    #[error("Parser error at line {line}: {message}")]
    Parser {
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// The input ended inside an entity or brush.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// A brush could not be built from its faces.
    #[error("Brush {brush} of entity {entity}: {source}")]
    Brush {
        /// Entity index in file order.
        entity: usize,
        /// Brush index within the entity.
        brush: usize,
        /// Underlying brush error.
        source: BrushError,
    },
}

impl MapError {
    /// Create a lexer error.
    pub fn lexer(line: usize, col: usize, message: impl Into<String>) -> Self {
        Self::Lexer {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create a parser error.
    pub fn parser(line: usize, message: impl Into<String>) -> Self {
        Self::Parser {
            line,
            message: message.into(),
        }
    }
}
