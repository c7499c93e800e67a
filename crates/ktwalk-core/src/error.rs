//! Error types and error code constants for ktwalk.
//!
//! This module provides a unified error type (`KtwalkError`) that bridges
//! failures from the different front-door operations (reading sources,
//! loading configuration, checking files) into a common format suitable for
//! text or JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: File not found
//! - `4`: Source has diagnostics (only raised under `--strict`)
//! - `10`: Internal errors (I/O, configuration, unexpected state)

use std::fmt;
use std::io;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for CLI exit status and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// A named source file does not exist.
    FileNotFound = 3,
    /// Parsing produced diagnostics and the caller asked for strictness.
    DiagnosticsFound = 4,
    /// Internal errors (I/O, configuration, bugs).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum KtwalkError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// One or more files produced lexer or parser diagnostics.
    #[error("{count} diagnostic(s) in {file}")]
    DiagnosticsFound { file: String, count: usize },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&KtwalkError> for OutputErrorCode {
    fn from(err: &KtwalkError) -> Self {
        match err {
            KtwalkError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            KtwalkError::FileNotFound { .. } => OutputErrorCode::FileNotFound,
            KtwalkError::DiagnosticsFound { .. } => OutputErrorCode::DiagnosticsFound,
            KtwalkError::Io { .. } => OutputErrorCode::InternalError,
            KtwalkError::Config(_) => OutputErrorCode::InternalError,
            KtwalkError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl KtwalkError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        KtwalkError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        KtwalkError::FileNotFound { path: path.into() }
    }

    /// Wrap an I/O error for `path`, mapping `NotFound` to [`KtwalkError::FileNotFound`].
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            KtwalkError::FileNotFound { path }
        } else {
            KtwalkError::Io { path, source }
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        KtwalkError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }

    /// Short machine-readable name of the variant, used in JSON output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            KtwalkError::InvalidArguments { .. } => "invalid_arguments",
            KtwalkError::FileNotFound { .. } => "file_not_found",
            KtwalkError::Io { .. } => "io",
            KtwalkError::Config(_) => "config",
            KtwalkError::DiagnosticsFound { .. } => "diagnostics_found",
            KtwalkError::InternalError { .. } => "internal",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
