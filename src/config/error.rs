use std::path::PathBuf;
use thiserror::Error;

use crate::engine::BindError;

/// Errors that can occur while loading a keys file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Keys file does not exist.
    #[error("Keys file not found: {0}")]
    NotFound(PathBuf),

    /// Line is not a comment, variable or known setting.
    #[error("Parse error on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    /// `$name` used but never defined.
    #[error("Undefined variable '${variable}' on line {line}")]
    UndefinedVariable { variable: String, line: usize },

    /// `trigger` value is not a keyboard event name.
    #[error("Invalid trigger '{value}' on line {line}: expected keydown, keyup or keypress")]
    InvalidTrigger { value: String, line: usize },

    /// Setting value has the wrong form.
    #[error("Invalid value '{value}' for '{setting}' on line {line}")]
    InvalidValue {
        setting: String,
        value: String,
        line: usize,
    },

    /// Combo on a `keys` line cannot be bound.
    #[error("Line {line}: {source}")]
    Bind {
        line: usize,
        #[source]
        source: BindError,
    },

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
