// ABOUTME: Error type for pipeline stage failures.
// ABOUTME: Carries the failing stage's identity alongside the underlying cause.

use super::Stage;

/// A fatal stage failure.
///
/// The final failure signal exposes which stage failed and why, so an
/// operator can tell a setup failure (host untouched) from an activation
/// failure (host degraded, no running instance).
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {message}")]
pub struct StageError {
    stage: Stage,
    message: String,
}

impl StageError {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
