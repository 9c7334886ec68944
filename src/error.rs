//! Error taxonomy
//!
//! Everything here is a configuration or capacity failure. Transient gating
//! (waiting to be allowed to spawn) is not an error and never shows up here.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced while loading content or running the simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// No backing document exists for the requested name
    #[error("document `{name}` not found")]
    NotFound { name: String },

    /// Document exists but is missing required fields or is otherwise invalid
    #[error("malformed document `{name}`: {reason}")]
    MalformedDocument { name: String, reason: String },

    /// The threat pool reached its maximum size
    #[error("threat pool exhausted ({capacity} threats allocated)")]
    PoolExhausted { capacity: usize },

    /// Underlying I/O failure other than a missing file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings are internally inconsistent
    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: String },
}

impl SimError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        SimError::MalformedDocument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
