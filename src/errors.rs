//! Error types for stack operations

use thiserror::Error;

/// Errors that can occur while rendering or provisioning the stack
#[derive(Debug, Error)]
pub enum StackError {
    /// Operator-supplied configuration is invalid or incomplete
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A rendered resource violates a cross-resource invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// The declared dependency graph cannot be ordered
    #[error("Dependency cycle involving resource: {0}")]
    DependencyCycle(String),

    /// The provisioning engine reported a failure
    #[error("Engine error: {0}")]
    Engine(String),

    /// Rollback after a failed apply did not complete cleanly
    #[error("Rollback error for {resource}: {reason}")]
    Rollback { resource: String, reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic stack error
    #[error("Stack error: {0}")]
    Generic(String),
}

/// Result type for stack operations
pub type StackResult<T> = Result<T, StackError>;

impl From<serde_json::Error> for StackError {
    fn from(err: serde_json::Error) -> Self {
        StackError::Serialization(err.to_string())
    }
}

impl From<crate::config::ConfigError> for StackError {
    fn from(err: crate::config::ConfigError) -> Self {
        StackError::Configuration(err.to_string())
    }
}
