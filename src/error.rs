//! Fatal error types surfaced at the API boundary.
//!
//! Infeasible candidates are not errors (the evaluator stamps a penalty),
//! and neither are timeouts or cancellation (engines return the current
//! archive). What remains is invalid configuration and malformed input.

use std::fmt;

/// A parameter is out of its valid range.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Name of the offending parameter.
    pub parameter: &'static str,
    pub message: String,
}

impl ConfigError {
    pub fn new(parameter: &'static str, message: impl Into<String>) -> Self {
        Self {
            parameter,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid parameter {}: {}", self.parameter, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Malformed input file, missing attraction, or inconsistent matrices.
#[derive(Debug)]
pub enum InputError {
    /// I/O failure while reading a file.
    Io(std::io::Error),
    /// Malformed CSV content.
    Csv(csv::Error),
    /// A field failed to parse.
    Field { line: usize, message: String },
    /// Matrix headers or shape disagree with the attraction set.
    MatrixMismatch(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io(e) => write!(f, "input read failed: {e}"),
            InputError::Csv(e) => write!(f, "malformed CSV: {e}"),
            InputError::Field { line, message } => {
                write!(f, "bad field at line {line}: {message}")
            }
            InputError::MatrixMismatch(message) => {
                write!(f, "inconsistent matrices: {message}")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io(e) => Some(e),
            InputError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(e: std::io::Error) -> Self {
        InputError::Io(e)
    }
}

impl From<csv::Error> for InputError {
    fn from(e: csv::Error) -> Self {
        InputError::Csv(e)
    }
}
