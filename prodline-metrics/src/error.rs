//! Error types for statistics export and reporting

use thiserror::Error;

/// Errors raised while rendering or exporting run results
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(String),
}
