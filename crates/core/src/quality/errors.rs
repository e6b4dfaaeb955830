//! Quality engine error types.

use thiserror::Error;

/// Errors specific to running the validation engine.
///
/// Data-quality defects are never errors; they are the engine's output.
/// These variants cover operational failures that must abort a run.
#[derive(Error, Debug)]
pub enum QualityError {
    /// A rule evaluator failed to execute.
    #[error("Quality rule '{check_id}' failed: {message}")]
    CheckFailed { check_id: String, message: String },

    /// The record store could not produce a usable snapshot.
    #[error("Snapshot unavailable: {0}")]
    SnapshotUnavailable(String),
}

impl QualityError {
    /// Creates a CheckFailed error.
    pub fn check_failed(check_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckFailed {
            check_id: check_id.into(),
            message: message.into(),
        }
    }
}

// Convert to core Error type
impl From<QualityError> for crate::errors::Error {
    fn from(err: QualityError) -> Self {
        crate::errors::Error::Unexpected(err.to_string())
    }
}
