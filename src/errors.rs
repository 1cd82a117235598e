/*!
 * Error types for the scriptpage application.
 *
 * Screenplay operations report advisory, non-corrupting failures through
 * `ScriptError`: an operation that fails has produced no edits. The
 * application shell wraps these in `AppError`, using the thiserror crate
 * for ergonomic error definitions.
 */

use thiserror::Error;

/// Named failure conditions of screenplay operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A scene number does not sort after its predecessor
    #[error("Scene number {number} at line {line} is out of order (must sort after {previous})")]
    OutOfOrderSceneNumber {
        /// 1-based line of the offending scene heading
        line: usize,
        /// Number found or derived at that heading
        number: String,
        /// Number it must be strictly greater than, or the bound it reached
        previous: String,
    },

    /// A scene number annotation could not be read in the configured style
    #[error("Malformed scene number '{text}' at line {line}")]
    MalformedSceneNumber {
        /// 1-based line of the scene heading
        line: usize,
        /// Annotation text between the # marks
        text: String,
    },

    /// No enclosing block at the requested position
    #[error("Not a moveable element at line {line}")]
    NotMoveable {
        /// 1-based line of the request
        line: usize,
    },

    /// A block move would cross a structural boundary
    #[error("Cannot shift past higher outline level at line {line}")]
    CannotShiftPastHigherLevel {
        /// 1-based line of the request
        line: usize,
    },

    /// Export requested for a script that has no file behind it
    #[error("Buffer has no backing destination")]
    NoBackingDestination,

    /// Configuration could not be turned into a working component
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a screenplay operation
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error loading or validating configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
