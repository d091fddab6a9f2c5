//! Error types for the dawaa engine.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, remote information sources, the
//! name lexicon, session handling, and serialization.

use thiserror::Error;

/// Unified error type for the dawaa engine.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Remote-source failures are recovered at the chain boundary and never
/// reach a user; the variants here exist for logging and for the few
/// genuinely fatal paths (bad config, broken data files).
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote information-source errors (network, timeout, bad payload)
    #[error("Source error: {0}")]
    Source(String),

    /// Name lexicon and resolution errors
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// Conversation session errors
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
