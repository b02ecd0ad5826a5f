//! Error types for vaultbank-core
//!
//! The list-processing functions are total and never fail; errors here
//! come from user input validation, the session store and authentication.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No active session
    Unauthorized,
    /// Rejected user input
    ValidationError,
    /// Session store could not be read or written
    StorageError,
    /// Stored data could not be decoded
    InvalidFormat,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational, the user can correct it
    Info,
    /// Operation refused
    Warning,
    /// Operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            suggestions: vec![],
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for vaultbank-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not logged in")]
    Unauthorized,

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

impl CoreError {
    /// Shorthand for a validation failure with a user-facing message
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Unauthorized => ErrorCode::Unauthorized,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::StorageError { .. } => ErrorCode::StorageError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Unauthorized => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Info,
            CoreError::StorageError { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Unauthorized => details
                .with_suggestion("Run `vaultbank login` first.".to_string())
                .with_suggestion(
                    "Pass --remember-me to keep the session across runs.".to_string(),
                ),
            CoreError::StorageError { .. } | CoreError::InvalidFormat { .. } => details
                .with_suggestion("Check the storage.path setting and file permissions.".to_string())
                .with_suggestion("Deleting the session file forces a fresh login.".to_string()),
            CoreError::ValidationError { .. } => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(error: std::io::Error) -> Self {
        CoreError::StorageError {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidFormat {
            message: error.to_string(),
        }
    }
}

// ==================== Tests ====================
