//! Error types for mockbase-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Event type {0} not supported")]
    UnsupportedEventType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No free push key after {attempts} attempts")]
    KeyExhausted { attempts: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
