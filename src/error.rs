// Error types for the fixture emitter
//
// Every failure is terminal for a single invocation: the binary logs the
// error once, prints a one-line diagnostic and exits with status 1.

use log::error;
use std::fmt;
use std::path::Path;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so the CLI and tests can tell failure cases
/// apart without matching on message text.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Log an emit error with structured context
///
/// The record carries:
/// - error_code: Numeric error code for programmatic handling
/// - context: Which step of the emit pipeline failed
/// - message: Human-readable error message
pub fn log_emit_error(err: &EmitError, context: &str) {
    error!(
        "Emit error in {}: code={}, component=FixtureEmitter, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Fixture emitter errors
///
/// Error code range: 3001-3006
#[derive(Debug, Clone, PartialEq)]
pub enum EmitError {
    /// Wrong or missing command-line arguments
    Usage { message: String },

    /// Destination could not be created or opened
    IoOpen { path: String, reason: String },

    /// Write call failed or wrote fewer bytes than the image size
    IoWrite {
        path: String,
        expected: usize,
        written: usize,
        reason: Option<String>,
    },

    /// A fixture constant does not fit the field's declared type
    Field { field: String, reason: String },

    /// Configuration file could not be read or parsed
    Config { path: String, reason: String },

    /// Layout report could not be serialized
    Report { path: String, reason: String },
}

impl EmitError {
    pub(crate) fn open(path: &Path, err: &std::io::Error) -> Self {
        EmitError::IoOpen {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn field(field: &str, reason: impl Into<String>) -> Self {
        EmitError::Field {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for EmitError {
    fn code(&self) -> i32 {
        match self {
            EmitError::Usage { .. } => 3001,
            EmitError::IoOpen { .. } => 3002,
            EmitError::IoWrite { .. } => 3003,
            EmitError::Field { .. } => 3004,
            EmitError::Config { .. } => 3005,
            EmitError::Report { .. } => 3006,
        }
    }

    fn message(&self) -> String {
        match self {
            EmitError::Usage { message } => message.clone(),
            EmitError::IoOpen { path, reason } => {
                format!("cannot open file {}: {}", path, reason)
            }
            EmitError::IoWrite {
                path,
                expected,
                written,
                reason: Some(reason),
            } => format!(
                "write error on {}: {} (wrote {} of {} bytes)",
                path, reason, written, expected
            ),
            EmitError::IoWrite {
                path,
                expected,
                written,
                reason: None,
            } => format!(
                "write error on {}: short write ({} of {} bytes)",
                path, written, expected
            ),
            EmitError::Field { field, reason } => {
                format!("invalid value for field {}: {}", field, reason)
            }
            EmitError::Config { path, reason } => {
                format!("invalid config {}: {}", path, reason)
            }
            EmitError::Report { path, reason } => {
                format!("cannot serialize layout report {}: {}", path, reason)
            }
        }
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for EmitError {}
