//! Error types for the tax engine.
//!
//! Calculation itself never fails: missing or malformed extraction data degrades to
//! zeros and audit warnings. The errors here cover the edges of the system, namely
//! loading tax-year configuration and validating API input.

use thiserror::Error;

/// The main error type for the tax engine.
///
/// # Example
///
/// ```
/// use tax_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/brackets.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/brackets.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A tax table parsed but is internally inconsistent.
    #[error("Invalid tax table '{table}': {message}")]
    InvalidTaxTable {
        /// The table that failed validation (e.g. "brackets.single").
        table: String,
        /// What was wrong with it.
        message: String,
    },

    /// A submitted document could not be turned into label/value data.
    #[error("Invalid document at index {index}: {message}")]
    InvalidDocument {
        /// Position of the document in the request.
        index: usize,
        /// A description of the problem.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
