//! Error types for the Astral core

use thiserror::Error;

use crate::lexer::Token;

/// Astral evaluation errors
///
/// Every language-level error carries the token it was detected at, so the
/// driver can point at the offending line and column.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Structurally unexpected token
    ///
    /// **Triggered by:** a conditional keyword other than `if` starting a
    /// construct, an `if` with no matching `end`, a missing `)`
    #[error("Syntax error at line {}, column {}: {message}", .token.line, .token.column)]
    SyntaxError {
        /// Offending token
        token: Box<Token>,
        /// Error description
        message: String,
    },

    /// A value of the wrong kind was used
    ///
    /// **Triggered by:** a non-boolean guard, `true + 1`, `"a" < 2`
    #[error("Conversion error at line {}, column {}: {message}", .token.line, .token.column)]
    ConversionError {
        /// Offending token
        token: Box<Token>,
        /// Error description
        message: String,
    },

    /// Reference to an unbound variable where a binding is required
    ///
    /// **Example:** `@total += 1` before `@total = 0`
    #[error("Undefined variable: {name}")]
    VariableUndefined {
        /// Offending token
        token: Box<Token>,
        /// Variable name
        name: String,
    },

    /// Builtin dispatch requested for a name no handler recognizes
    #[error("Unknown builtin: {name}")]
    UnknownBuiltin {
        /// Offending token
        token: Box<Token>,
        /// Builtin name
        name: String,
    },

    /// Builtin called with the wrong number of arguments
    #[error("Unexpected arguments for builtin {name}: expected {expected}, got {got}")]
    BuiltinUnexpectedArgument {
        /// Offending token
        token: Box<Token>,
        /// Builtin name
        name: String,
        /// Expected argument count
        expected: usize,
        /// Actual argument count
        got: usize,
    },

    /// Integer division or modulus by zero
    #[error("Division by zero")]
    DivisionByZero {
        /// Offending token
        token: Box<Token>,
    },

    /// The output sink rejected a write
    #[error("I/O error: {message}")]
    Io {
        /// Error message
        message: String,
    },
}

impl Error {
    pub fn syntax(token: &Token, message: impl Into<String>) -> Self {
        Error::SyntaxError {
            token: Box::new(token.clone()),
            message: message.into(),
        }
    }

    pub fn conversion(token: &Token, message: impl Into<String>) -> Self {
        Error::ConversionError {
            token: Box::new(token.clone()),
            message: message.into(),
        }
    }

    pub fn undefined(token: &Token, name: impl Into<String>) -> Self {
        Error::VariableUndefined {
            token: Box::new(token.clone()),
            name: name.into(),
        }
    }

    pub fn division_by_zero(token: &Token) -> Self {
        Error::DivisionByZero {
            token: Box::new(token.clone()),
        }
    }

    /// The token the error was detected at
    pub fn token(&self) -> Option<&Token> {
        match self {
            Error::SyntaxError { token, .. }
            | Error::ConversionError { token, .. }
            | Error::VariableUndefined { token, .. }
            | Error::UnknownBuiltin { token, .. }
            | Error::BuiltinUnexpectedArgument { token, .. }
            | Error::DivisionByZero { token } => Some(token),
            Error::Io { .. } => None,
        }
    }

    /// Error-kind label shown by the renderer
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::SyntaxError { .. } => "SyntaxError",
            Error::ConversionError { .. } => "ConversionError",
            Error::VariableUndefined { .. } => "VariableUndefinedError",
            Error::UnknownBuiltin { .. } => "UnknownBuiltinError",
            Error::BuiltinUnexpectedArgument { .. } => "BuiltinUnexpectedArgumentError",
            Error::DivisionByZero { .. } => "DivisionByZeroError",
            Error::Io { .. } => "IoError",
        }
    }

    /// Detail line for the renderer, without the position prefix
    pub fn message(&self) -> String {
        match self {
            Error::SyntaxError { message, .. } | Error::ConversionError { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for Astral operations
pub type Result<T> = std::result::Result<T, Error>;
