//! JSON output types for CLI responses.
//!
//! Every JSON response carries a `status` and a `schema_version`. Responses
//! specific to a command are defined next to the command; this module holds
//! the shared pieces and the single emit path.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::KtwalkError;

/// Version of the JSON output schema.
pub const SCHEMA_VERSION: &str = "1";

/// A 1-indexed source position with optional byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path as given on the command line.
    pub file: String,
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column (chars).
    pub col: u32,
    /// Start byte offset, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_start: Option<usize>,
    /// End byte offset, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_end: Option<usize>,
}

impl Location {
    /// Create a location without byte offsets.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
            byte_start: None,
            byte_end: None,
        }
    }

    /// Attach byte offsets.
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.byte_start = Some(start);
        self.byte_end = Some(end);
        self
    }
}

/// Error details inside an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code (also the process exit code).
    pub code: u8,
    /// Machine-readable error kind.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    /// Build error details from a [`KtwalkError`].
    pub fn from_error(err: &KtwalkError) -> Self {
        ErrorInfo {
            code: err.error_code().code(),
            kind: err.kind_name().to_string(),
            message: err.to_string(),
        }
    }
}

/// Response emitted when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Build an error response for `err`.
    pub fn new(err: &KtwalkError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
///
/// This is the single output path for JSON, ensuring consistency.
/// The output is deterministic: same input produces identical bytes.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
