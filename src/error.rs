//! Error types for quoting and document export.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for quote processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// Malformed session script (-3)
    ScriptError = -3,
    /// Read or write failure (-4)
    IoError = -4,
    /// Rejected input value (E100)
    Validation = 100,
    /// Item index out of range (E101)
    IndexOutOfRange = 101,
    /// Document rendering failed (E300)
    RenderFailed = 300,
}

/// Main error type for the quoting tool.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Item index {index} is out of range (ledger has {len} item(s))")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Invalid session script: {message}")]
    Script { message: String },

    #[error("PDF rendering failed: {message}")]
    Pdf { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    /// Build a validation error for a named input field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        QuoteError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QuoteError::Validation { .. } => ErrorCode::Validation,
            QuoteError::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            QuoteError::FileNotFound { .. } => ErrorCode::FileNotFound,
            QuoteError::EmptyFile { .. } => ErrorCode::EmptyFile,
            QuoteError::Script { .. } => ErrorCode::ScriptError,
            QuoteError::Pdf { .. } => ErrorCode::RenderFailed,
            QuoteError::Io(_) => ErrorCode::IoError,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// Whether the error came from user input that the session can shrug off.
    ///
    /// Rejected actions leave the ledger untouched, so the caller only has to
    /// show the message.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            QuoteError::Validation { .. } | QuoteError::IndexOutOfRange { .. }
        )
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Script {
            message: err.to_string(),
        }
    }
}

/// Result type alias for quote operations.
pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = QuoteError::validation("width_m", "must be greater than zero");
        assert_eq!(err.code(), ErrorCode::Validation);
        assert_eq!(err.code_value(), 100);
        assert!(err.is_user_error());

        let err = QuoteError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(err.code_value(), 101);
        assert!(err.is_user_error());

        let err = QuoteError::Pdf {
            message: "boom".into(),
        };
        assert_eq!(err.code(), ErrorCode::RenderFailed);
        assert!(!err.is_user_error());

        let err = QuoteError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only directory",
        ));
        assert_eq!(err.code(), ErrorCode::IoError);
        assert_eq!(err.code_value(), -4);
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_error_messages() {
        let err = QuoteError::validation("description", "must not be empty");
        assert_eq!(err.to_string(), "Invalid description: must not be empty");

        let err = QuoteError::IndexOutOfRange { index: 5, len: 1 };
        assert_eq!(
            err.to_string(),
            "Item index 5 is out of range (ledger has 1 item(s))"
        );
    }
}
