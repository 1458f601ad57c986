//! Error types for the simulation framework

use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A parameter was rejected while constructing a model or distribution.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A primitive was called outside its contract (for example `get(0)`).
    #[error("Invalid argument to {operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    /// Internal bookkeeping no longer agrees with itself. The run cannot
    /// continue.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Component not found with ID: {id}")]
    ComponentNotFound { id: String },

    #[error("Time validation error: expected finite non-negative time, got {0}")]
    InvalidTime(f64),
}

impl SimError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SimError::Configuration(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        SimError::Invariant(message.into())
    }
}
