//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout the mechanic shop console.
//! Every handler failure is a `ShopError`; the session prints it and carries on.
//!
//! # Error Categories
//! - `ConnectionFailed`: Database connection errors (fatal at startup)
//! - `QueryFailed`: Statement preparation or execution errors
//! - `InvalidInput`: Operator input that could not be parsed or is out of range
//! - `Rejected`: A business check refused the action (unknown mechanic, future date, ...)
//! - `ConfigError`: Configuration file or environment errors
//! - `Io`: Console read/write failures
//! - `EndOfInput`: The operator's input stream is exhausted

use thiserror::Error;

/// Main error type for mechanic shop operations
#[derive(Error, Debug)]
pub enum ShopError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Invalid operator input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Action refused by a precondition check; the message is shown verbatim
    #[error("{0}")]
    Rejected(String),

    /// Configuration error (unreadable file, invalid JSON, missing variable)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Console I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Console input reached end of stream
    #[error("Unexpected end of input")]
    EndOfInput,
}

impl ShopError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Rejected(_) => "REJECTED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::EndOfInput => "END_OF_INPUT",
        }
    }

    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

/// Result type alias for mechanic shop operations
pub type Result<T> = std::result::Result<T, ShopError>;
