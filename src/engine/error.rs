use thiserror::Error;

use crate::core::ParseError;

/// Errors returned by binding operations.
///
/// Nothing is caught inside the engine; every failure is returned to the
/// caller of `bind`, `unbind` or `delegate`.
#[derive(Debug, Error, PartialEq)]
pub enum BindError {
    /// Combo string could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Base key is neither a single character nor a named key.
    #[error("Unresolved key '{key}' in combo '{combo}'")]
    UnresolvedKey { key: String, combo: String },

    /// Handler given by name and the view has no such method.
    #[error("View has no handler method named '{0}'")]
    UnresolvedHandler(String),
}
