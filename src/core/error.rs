//! Console error types.
//!
//! Every variant renders as the single line that gets written to the console
//! log. None of them are fatal: the console reports and keeps going.

use thiserror::Error;

use super::VarType;

/// Errors produced by registry lookups, variable assignment and the
/// collaborators the built-in commands call into.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The first token of a submitted line names neither a command nor a variable.
    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),

    /// Lookup or assignment on a variable that is not registered.
    #[error("Unknown variable \"{0}\"")]
    UnknownVariable(String),

    /// A value of one type was assigned to a variable declared with another.
    #[error("Cannot assign {found} to \"{name}\" (declared {expected})")]
    TypeMismatch {
        name: String,
        expected: VarType,
        found: VarType,
    },

    /// A raw argument token could not be parsed into the variable's type.
    #[error("Cannot convert \"{input}\" to {target} for \"{name}\"")]
    ConversionError {
        name: String,
        input: String,
        target: VarType,
    },

    /// The frame capture backend failed or is missing.
    #[error("{0}")]
    Capture(String),

    /// Filesystem error while preparing a screenshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
