//! Unified error handling for the remixer crate
//!
//! Every public operation surfaces one of these variants; nothing is
//! swallowed internally. Remote failures (generation provider, publish API,
//! store) carry the remote's status detail so callers can distinguish
//! "generated but not saved" from "saved".

use thiserror::Error;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed caller input (empty source text, bad timestamp, ...)
    Validation,
    /// Aggregate or variation absent
    NotFound,
    /// Operation not allowed in the current lifecycle state
    Conflict,
    /// Remote collaborator failed (provider, publish API)
    Remote,
    /// Aggregate store failure
    Storage,
    /// Configuration errors
    Config,
}

/// Unified error type for the remixer crate
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input, rejected before any side effect
    #[error("Validation error: {0}")]
    Validation(String),

    /// Aggregate or variation not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation conflicts with the current lifecycle state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Publish attempted for a platform the publisher does not support
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Text-completion provider failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Publish API failed (identity resolution or submission)
    #[error("Publish error: {0}")]
    Publish(String),

    /// Aggregate store write/read failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a publish error
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Conflict(_) | Self::UnsupportedPlatform(_) => ErrorCategory::Conflict,
            Self::Generation(_) | Self::Publish(_) => ErrorCategory::Remote,
            Self::Persistence(_) => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Check if this error is recoverable (a later attempt may succeed)
    ///
    /// Only remote failures qualify; the watcher relies on this to leave a
    /// still-Scheduled variation eligible for its next scan.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Generation(_) | Self::Publish(_) | Self::Persistence(_)
        )
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
